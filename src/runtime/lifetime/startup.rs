use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, SeedConfig};
use crate::errors::Result;
use crate::models::seed::entities::SeedSummary;
use crate::seed::SeedPlan;
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 准备服务器启动的上下文
/// 包括数据库连接与迁移
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let storage = crate::storage::create_storage(&config.database).await?;
    if config.database.run_migrations {
        warn!("Storage backend initialized and migrations completed");
    } else {
        warn!("Storage backend initialized, migrations skipped by configuration");
    }

    Ok(StartupContext { storage })
}

/// 生成随机数据并写入数据库
///
/// 指定 `rng_seed` 时生成结果可复现。
pub async fn seed_database(
    storage: &Arc<dyn Storage>,
    config: &SeedConfig,
    rng_seed: Option<u64>,
) -> Result<SeedSummary> {
    let today = chrono::Utc::now().date_naive();
    let plan = match rng_seed {
        Some(seed) => {
            info!("Generating seed data with fixed RNG seed {}", seed);
            SeedPlan::generate(config, &mut StdRng::seed_from_u64(seed), today)?
        }
        None => SeedPlan::generate(config, &mut rand::rng(), today)?,
    };

    storage.seed(plan).await
}
