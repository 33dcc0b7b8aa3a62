//! 缓存层
//!
//! ObjectCache 是统一的对象缓存抽象；具体后端（Moka 内存缓存、Redis）
//! 通过 `declare_object_cache_plugin!` 在进程启动时注册到插件注册表，
//! 运行时按配置选择，失败时回退到内存缓存。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache};
