//! 缓存后端插件表
//!
//! 各后端通过 `declare_object_cache_plugin!` 在程序加载时登记构造函数，
//! 启动流程按 `cache.cache_type` 取出对应后端。

use crate::cache::ObjectCache;
use crate::errors::{Result, SkillLinkError};
use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Arc, PoisonError, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

// 表中只有构造函数，锁中毒后数据仍然可用
static OBJECT_CACHE_REGISTRY: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.into(), constructor);
}

/// 按名称取出后端构造函数，未登记时错误信息列出可用后端
pub fn get_object_cache_plugin(name: &str) -> Result<ObjectCacheConstructor> {
    let registry = OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner);

    registry.get(name).cloned().ok_or_else(|| {
        let available: Vec<&str> = registry.keys().map(String::as_str).collect();
        SkillLinkError::cache_plugin_not_found(format!(
            "cache backend '{name}' is not registered (available: {})",
            available.join(", ")
        ))
    })
}

/// 已登记的后端名称，按字母序
pub fn registered_object_cache_plugins() -> Vec<String> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        let names = registered_object_cache_plugins();
        assert!(names.iter().any(|n| n == "moka"));
        assert!(names.iter().any(|n| n == "redis"));
        assert!(get_object_cache_plugin("moka").is_ok());
    }

    #[test]
    fn test_unknown_backend_lists_available() {
        let err = match get_object_cache_plugin("memcached") {
            Ok(_) => panic!("memcached should not be registered"),
            Err(e) => e,
        };
        assert!(matches!(err, SkillLinkError::CachePluginNotFound(_)));
        assert!(err.message().contains("moka"));
    }
}
