use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_initial_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 内存缓存兜底
async fn fallback_to_moka() -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin("moka")?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created fallback Moka (in-memory) cache backend");
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create fallback Moka cache: {}", e);
            None
        }
    }
}

/// 创建缓存实例
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    match get_object_cache_plugin(cache_type) {
        Some(constructor) => match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create {} cache: {}", cache_type, e);
                if cache_type != "moka" {
                    warn!("Falling back to memory cache");
                    if let Some(cache) = fallback_to_moka().await {
                        return Ok(cache);
                    }
                }
            }
        },
        None => {
            warn!("Cache backend '{}' not found in registry", cache_type);
            if cache_type != "moka" {
                warn!("Falling back to default memory cache");
                if let Some(cache) = fallback_to_moka().await {
                    return Ok(cache);
                }
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 初始化默认管理员账号
/// 库中没有管理员时创建 `admin`
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.has_admin().await {
        Ok(true) => {
            debug!("Admin account already exists, skipping admin seed");
            return;
        }
        Ok(false) => {
            info!("No admin found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to check admin accounts: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量，否则生成一次性密码
    let password = std::env::var("ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| {
            let pwd = generate_initial_password();
            warn!("==========================================================");
            warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated admin password: {}", pwd);
            warn!("  Please save this password or set ADMIN_PASSWORD env var");
            warn!("==========================================================");
            pwd
        });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
        school_name: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备上传目录
fn prepare_upload_dir() {
    let upload_dir = &AppConfig::get().upload.dir;
    if let Err(e) = std::fs::create_dir_all(upload_dir) {
        warn!("Failed to create upload directory {}: {}", upload_dir, e);
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和上传目录
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    debug!(
        "Registered cache backends: {:?}",
        crate::cache::register::registered_object_cache_plugins()
    );

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    prepare_upload_dir();

    StartupContext { storage, cache }
}
