/// 名称过滤条件的最大长度（字符）
pub const MAX_FILTER_NAME_LEN: usize = 255;

/// 校验科目、教师、分组等名称过滤条件
///
/// 名称在比较前会统一转为小写，这里只拒绝无法产生有意义比较的输入。
pub fn validate_filter_name(name: &str) -> Result<(), &'static str> {
    // 空白名称没有对应的记录
    if name.trim().is_empty() {
        return Err("Name must not be empty");
    }
    if name.chars().count() > MAX_FILTER_NAME_LEN {
        return Err("Name must not exceed 255 characters");
    }
    Ok(())
}

/// 名称的比较键：按 Unicode 规则转为小写
///
/// 写入时存入 `name_key` 列，查询时对过滤条件做同样处理，
/// 比较不依赖数据库自身的 `LOWER` 实现。
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}
