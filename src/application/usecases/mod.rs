// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用用例模块
///
/// 页面扫描与网站扫描用例，负责协调浏览器引擎与结果整理
pub mod scan_page;
pub mod scan_website;
