use crate::database::SharedStore;
use crate::error::{AppError, AppResult};
use crate::models::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const MAX_VALUE_LEN: usize = 4096;

#[derive(Clone)]
pub struct SettingService {
    store: SharedStore,
}

impl SettingService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 全部站点设置，key -> value
    pub async fn list_settings(&self) -> AppResult<BTreeMap<String, String>> {
        let list = self.store.list_settings().await?;
        Ok(list.into_iter().map(|s| (s.key, s.value)).collect())
    }

    /// 更新设置，不存在时创建
    pub async fn update_setting(&self, key: &str, value: &str) -> AppResult<SettingResponse> {
        validate_key(key)?;
        if value.chars().count() > MAX_VALUE_LEN {
            return Err(AppError::ValidationError(format!(
                "Setting value must not exceed {MAX_VALUE_LEN} characters"
            )));
        }

        let setting = self.store.upsert_setting(key, value).await?;
        log::info!("Setting {} updated", setting.key);
        Ok(setting.into())
    }
}

fn validate_key(key: &str) -> AppResult<()> {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    let re = KEY_RE.get_or_init(|| Regex::new(r"^[a-z0-9_.-]{1,64}$").expect("valid regex"));
    if !re.is_match(key) {
        return Err(AppError::ValidationError(
            "Setting key must be 1-64 lowercase letters, digits, '_', '.' or '-'".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use std::sync::Arc;

    fn service() -> SettingService {
        SettingService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_update_and_list_settings() {
        let service = service();
        service.update_setting("site_title", "Prize Wheel").await.unwrap();
        service.update_setting("site_title", "Spin Night").await.unwrap();
        service
            .update_setting("background_color", "#111827")
            .await
            .unwrap();

        let map = service.list_settings().await.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["site_title"], "Spin Night");
        assert_eq!(map["background_color"], "#111827");
    }

    #[tokio::test]
    async fn test_empty_value_allowed() {
        let service = service();
        let setting = service.update_setting("meta_description", "").await.unwrap();
        assert_eq!(setting.value, "");
    }

    #[tokio::test]
    async fn test_invalid_key_and_value() {
        let service = service();
        for key in ["", "Site Title", "key with space", &"k".repeat(65)] {
            assert!(matches!(
                service.update_setting(key, "x").await,
                Err(AppError::ValidationError(_))
            ));
        }
        assert!(matches!(
            service
                .update_setting("site_title", &"x".repeat(MAX_VALUE_LEN + 1))
                .await,
            Err(AppError::ValidationError(_))
        ));
        assert!(service.list_settings().await.unwrap().is_empty());
    }
}
