//! 缓存层
//!
//! 通过插件注册表按名称选择后端（`moka` 内存缓存或 `redis`），
//! 目前用于缓存 JWT 对应的已认证用户信息。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明一个缓存插件，程序启动时通过 ctor 自动注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                            .map_err($crate::errors::SkillLinkError::cache_connection)
                    })
                }),
            );
        }
    };
}
