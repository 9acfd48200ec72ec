// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了扫描流水线的核心数据结构，包括：
/// - 扫描任务（scan_job）：从任务队列接收的工作单元
/// - 扫描结果（scan_result）：发布到结果队列的规范化结果
/// - 引擎输出（engine_output）：无障碍引擎返回的原始数据
/// - 失败原因（failure）：错误信息的统一描述
/// - 评分（scoring）：由扫描结果派生的页面与网站评分
pub mod engine_output;
pub mod failure;
pub mod scan_job;
pub mod scan_result;
pub mod scoring;
