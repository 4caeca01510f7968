//! # pathway-algo - 学习路径个性化核心算法库
//!
//! 本 crate 提供纯 Rust 实现的学习路径个性化算法:
//!
//! - **Mastery Estimation** - 基于作答记录估计概念掌握度
//! - **Adaptive Difficulty** - 带滞回带的难度自适应控制
//! - **Path Planning** - 基于先修关系图的学习路径规划
//! - **Outcome Prediction** - 学习目标成功率/完成率预测
//! - **Recommendations** - 难度、内容形式与专项练习建议
//!
//! ## 设计理念
//!
//! - **纯函数** - 所有算法均为同步纯计算，无 I/O
//! - **只读共享** - 知识图谱构建一次，之后只读共享
//! - **可配置** - 所有阈值与权重集中在 [`config::EngineConfig`]
//! - **数值稳健** - NaN/Inf 输入被过滤或钳制，不会传播到结果
//!
//! ## 模块结构
//!
//! - [`graph`] - 知识图谱 (先修关系、拓扑展开、环检测)
//! - [`catalog`] - 内置标准课程图谱
//! - [`mastery`] - 掌握度估计 (正确率、时间一致性、置信度)
//! - [`difficulty`] - 难度自适应控制
//! - [`style`] - 学习风格分类
//! - [`planner`] - 学习路径规划与重新规划
//! - [`predictor`] - 学习结果预测
//! - [`recommend`] - 个性化建议生成
//! - [`session`] - 最佳单次学习时长
//! - [`engine`] - 组件门面
//! - [`config`] - 参数配置
//! - [`sanitize`] - 数据清洗 (数值稳定性、验证)
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use pathway_algo::{KnowledgeGraph, LearnerProfile, PathwayEngine};
//!
//! let graph = Arc::new(KnowledgeGraph::standard_curriculum().unwrap());
//! let engine = PathwayEngine::with_defaults(graph);
//!
//! let profile = LearnerProfile::new("learner-1");
//! let path = engine.plan(&profile, &["traits"]);
//! assert!(path.concept_ids().contains(&"ownership"));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod catalog;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod graph;
pub mod mastery;
pub mod planner;
pub mod predictor;
pub mod recommend;
pub mod sanitize;
pub mod session;
pub mod style;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

/// 重新导出配置
pub use config::{ConfigError, EngineConfig};

/// 重新导出知识图谱
pub use graph::{Concept, GraphError, KnowledgeGraph, KnowledgeGraphBuilder};

/// 重新导出各算法组件
pub use difficulty::DifficultyController;
pub use mastery::MasteryEstimator;
pub use planner::PathPlanner;
pub use predictor::OutcomePredictor;
pub use recommend::RecommendationEngine;
pub use session::SessionLengthOptimizer;
pub use style::{LearningStyleClassifier, StyleTally};

/// 重新导出门面
pub use engine::PathwayEngine;
