use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware, web};
use sqlx::sqlite::SqlitePool;

use crate::config::{JudgeConfig, ServerConfig};
use crate::queue::SubmissionQueue;
use crate::routes::{
    create_submission_handler, get_submission_handler, health_handler, json_error_handler,
};

pub fn build_server(
    server_config: ServerConfig,
    judge_config: JudgeConfig,
    db_pool: SqlitePool,
    queue: Arc<SubmissionQueue>,
) -> std::io::Result<Server> {
    // The JSON body carries the source plus the test cases
    let payload_limit = judge_config.max_source_bytes * 2;

    let db_pool = web::Data::new(db_pool);
    let judge_config = web::Data::new(judge_config);
    let queue = web::Data::from(queue);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(judge_config.clone())
            .app_data(queue.clone())
            .app_data(
                web::JsonConfig::default()
                    .limit(payload_limit)
                    .error_handler(json_error_handler),
            )
            .wrap(middleware::Logger::default())
            .service(create_submission_handler)
            .service(get_submission_handler)
            .service(health_handler)
    })
    .bind((
        server_config
            .bind_address
            .unwrap_or("127.0.0.1".to_string()),
        server_config.bind_port.unwrap_or(8080),
    ))?
    .run();

    Ok(server)
}
