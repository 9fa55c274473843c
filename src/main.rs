use anyhow::Result;
use quiz_solver::models::SolveRequest;
use quiz_solver::{Config, Solver};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    quiz_solver::utils::logging::init();

    // 加载配置
    let config = Config::from_env();

    // 目标 URL 来自命令行参数
    let url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("用法: quiz_solver <url>"))?;

    let solver = Solver::new(config);
    let result = solver.solve(&SolveRequest::new(url)).await?;

    // 结果以 JSON 输出，方便上游服务直接透传
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
