//! 文件与保存状态类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 文件列表项（不含内容）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub language: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(deserialize_with = "crate::util::time::deserialize")]
    pub updated_at: DateTime<Utc>,
}

/// 服务端文件（含内容）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub content: String,
    pub language: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(deserialize_with = "crate::util::time::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "crate::util::time::deserialize")]
    pub updated_at: DateTime<Utc>,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl FileContent {
    /// 列表视图
    pub fn to_item(&self) -> FileItem {
        FileItem {
            id: self.id,
            name: self.name.clone(),
            path: self.path.clone(),
            language: self.language.clone(),
            is_deleted: self.is_deleted,
            sort_order: 0,
            updated_at: self.updated_at,
        }
    }
}

/// 保存状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Saved,
    Saving,
    Unsaved,
    Offline,
    Error,
}

impl SaveStatus {
    pub fn label(self) -> &'static str {
        match self {
            SaveStatus::Saved => "已保存",
            SaveStatus::Saving => "保存中...",
            SaveStatus::Unsaved => "未保存",
            SaveStatus::Offline => "离线",
            SaveStatus::Error => "保存失败",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
