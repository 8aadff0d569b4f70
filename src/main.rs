use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, warn};

// 从 lib.rs 导入模块
use academic_records::config::AppConfig;
use academic_records::errors::{AppError, Result};
use academic_records::routes;
use academic_records::storage::Storage;
use academic_records::storage::sea_orm_storage::SeaOrmStorage;
use academic_records::runtime::lifetime;
use academic_records::runtime::report::{ReportFilters, collect_reports};

#[derive(Parser)]
#[command(name = "academic-records", version, about = "Academic records service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 清空数据库并写入随机数据
    Seed {
        /// 固定随机数种子，生成结果可复现
        #[arg(long, env = "SEED_RNG_SEED")]
        rng_seed: Option<u64>,
    },
    /// 清空全部数据，保留表结构
    Clear,
    /// 仅执行数据库迁移
    Migrate,
    /// 在终端输出全部报表
    Report {
        #[arg(long, default_value = "Police")]
        subject: String,
        #[arg(long, default_value = "Prof. Johnson")]
        teacher: String,
        #[arg(long, default_value = "Group 1")]
        group: String,
    },
}

fn main() {
    dotenv().ok();
    setup_panic!();

    let cli = Cli::parse();

    if let Err(e) = AppConfig::init() {
        eprintln!("{}", AppError::from(e).format_simple());
        std::process::exit(1);
    }
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let outcome = runtime.block_on(async move {
        match cli.command.unwrap_or(Command::Serve) {
            Command::Serve => serve(config).await,
            Command::Seed { rng_seed } => seed(config, rng_seed).await,
            Command::Clear => clear(config).await,
            Command::Migrate => migrate(config).await,
            Command::Report {
                subject,
                teacher,
                group,
            } => {
                report(
                    config,
                    ReportFilters {
                        subject,
                        teacher,
                        group,
                    },
                )
                .await
            }
        }
    });

    if let Err(e) = outcome {
        print_error(&e);
        // 退出前刷新日志
        drop(_guard);
        std::process::exit(1);
    }
}

fn print_error(err: &AppError) {
    #[cfg(debug_assertions)]
    eprintln!("{}", err.format_colored());
    #[cfg(not(debug_assertions))]
    {
        eprintln!("{}", err.format_simple());
        if let Some(hint) = err.hint() {
            eprintln!("  hint: {hint}");
        }
    }
}

async fn serve(config: &'static AppConfig) -> Result<()> {
    let start = chrono::Utc::now();

    // 打印信息
    warn!(
        "Starting pre-startup processing...
        Project: {}
        Version: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let startup = lifetime::startup::prepare_server_startup(config).await?;
    let storage = startup.storage.clone();

    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(start)
            .num_milliseconds()
    );

    warn!("Using {} CPU cores for the server", config.server.workers);

    let bind_address = config.server_bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(config.cors.max_age),
            )
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::Data::new(storage.clone()))
            .configure(routes::configure_report_routes) // 报表路由
            .configure(routes::configure_system_routes) // 系统路由
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    )) // 启用长连接
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    )) // 客户端超时
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    )) // 断连超时
    .workers(config.server.workers);

    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .map_err(|e| AppError::configuration(format!("无法绑定 {bind_address}: {e}")))?
        .run();

    tokio::select! {
        res = server => {
            res.map_err(|e| AppError::configuration(format!("服务器异常退出: {e}")))?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}

async fn seed(config: &'static AppConfig, rng_seed: Option<u64>) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config).await?;
    let summary =
        lifetime::startup::seed_database(&startup.storage, &config.seed, rng_seed).await?;
    println!(
        "Seeded {} groups, {} teachers, {} subjects, {} students, {} grades",
        summary.groups, summary.teachers, summary.subjects, summary.students, summary.grades
    );
    Ok(())
}

async fn clear(config: &'static AppConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config).await?;
    startup.storage.clear_all().await?;
    println!("All records cleared");
    Ok(())
}

async fn migrate(config: &'static AppConfig) -> Result<()> {
    let storage = SeaOrmStorage::connect(&config.database).await?;
    storage.migrate().await?;
    println!("Migrations applied");
    Ok(())
}

async fn report(config: &'static AppConfig, filters: ReportFilters) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config).await?;
    let sections = collect_reports(startup.storage.as_ref(), &filters).await?;
    for section in sections {
        println!("{}", section.render());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["academic-records"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_seed_and_clear_subcommands() {
        let cli = Cli::try_parse_from(["academic-records", "seed", "--rng-seed", "7"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Seed { rng_seed: Some(7) })));

        let cli = Cli::try_parse_from(["academic-records", "clear"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Clear)));
    }

    #[test]
    fn test_rng_seed_reads_environment() {
        let command = Cli::command();
        let seed = command.find_subcommand("seed").unwrap();
        let arg = seed
            .get_arguments()
            .find(|arg| arg.get_id() == "rng_seed")
            .unwrap();
        assert_eq!(
            arg.get_env(),
            Some(std::ffi::OsStr::new("SEED_RNG_SEED"))
        );
    }

    #[test]
    fn test_report_defaults() {
        let cli = Cli::try_parse_from(["academic-records", "report", "--group", "Group 2"]).unwrap();
        match cli.command {
            Some(Command::Report {
                subject,
                teacher,
                group,
            }) => {
                assert_eq!(subject, "Police");
                assert_eq!(teacher, "Prof. Johnson");
                assert_eq!(group, "Group 2");
            }
            _ => panic!("expected report subcommand"),
        }
    }
}
