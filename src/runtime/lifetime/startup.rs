use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{
    ObjectCache, object_cache::moka::MokaCacheWrapper, register::get_object_cache_plugin,
};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::gamification::engine::default_badges;
use crate::storage::Storage;
use crate::utils::password::hash_password;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// 按配置创建缓存，失败时回退到内存缓存
async fn create_cache() -> Arc<dyn ObjectCache> {
    let config = AppConfig::get();
    let cache_type = config.cache.cache_type.as_str();

    match get_object_cache_plugin(cache_type) {
        Ok(constructor) => match constructor().await {
            Ok(cache) => {
                warn!("Using {} cache backend", cache_type);
                // 清掉上次运行留下的用户缓存
                cache.invalidate_all().await;
                return Arc::from(cache);
            }
            Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
        },
        Err(e) => warn!("{}", e),
    }

    warn!("Falling back to in-memory (moka) cache");
    Arc::new(MokaCacheWrapper::with_settings(
        config.cache.memory.max_capacity,
        config.cache.default_ttl,
    ))
}

fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    let mut password: String = (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    // 保证满足密码策略
    password.push_str("Aa1");
    password
}

/// 不存在 admin 账号时创建
async fn seed_admin(storage: &dyn Storage) -> Result<()> {
    if storage
        .get_user_by_username(DEFAULT_ADMIN_USERNAME)
        .await?
        .is_some()
    {
        debug!("Admin account already exists, skipping seed");
        return Ok(());
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD is not set, generated a password for 'admin':");
        warn!("  {}", generated);
        warn!("  Save it now or set ADMIN_PASSWORD before the next start");
        warn!("==========================================================");
        generated
    });

    let password_hash = hash_password(&password)?;

    let admin = storage
        .create_user(CreateUserRequest {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            email: "admin@skilllink.local".to_string(),
            password: password_hash,
            role: UserRole::Admin,
            display_name: Some("Administrator".to_string()),
            avatar_url: None,
        })
        .await?;

    info!("Default admin account created (ID: {})", admin.id);
    Ok(())
}

/// 写入缺失的默认徽章，已存在的不覆盖
async fn seed_badges(storage: &dyn Storage) -> Result<usize> {
    let mut created = 0;
    for badge in default_badges() {
        if storage.get_badge_by_code(&badge.code).await?.is_some() {
            continue;
        }
        storage.create_badge(badge).await?;
        created += 1;
    }
    Ok(created)
}

/// 准备服务器启动所需的存储与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // redis 和数据库驱动都使用 rustls，重复安装时忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    debug!(
        "Registered cache backends: {:?}",
        crate::cache::register::registered_object_cache_plugins()
    );

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    if let Err(e) = seed_admin(storage.as_ref()).await {
        warn!("Failed to seed admin account: {}", e);
    }

    if AppConfig::get().gamification.seed_default_badges {
        match seed_badges(storage.as_ref()).await {
            Ok(0) => debug!("Default badges already present"),
            Ok(count) => info!("Seeded {} default badges", count),
            Err(e) => warn!("Failed to seed default badges: {}", e),
        }
    }

    let cache = create_cache().await;

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_random_password(16);
            assert_eq!(password.len(), 19);
            assert!(validate_password(&password).is_valid);
        }
    }
}
