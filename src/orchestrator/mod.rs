//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::Solver (持有 Browser，单次求解入口)
//!     ↓
//! workflow::SolveFlow (处理单个 URL 的完整流程)
//!     ↓
//! services (能力层：navigate / fetch / extract / llm / submit)
//!     ↓
//! infrastructure (基础设施：JsExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：编排层只管资源生命周期与调度
//! 2. **资源隔离**：只有编排层持有 Browser
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod solver;

pub use solver::Solver;
