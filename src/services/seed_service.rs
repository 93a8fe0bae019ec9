use crate::database::{NewSegment, SharedStore};
use crate::error::AppResult;

/// 默认转盘扇区 (文字, 颜色)
pub const DEFAULT_SEGMENTS: [(&str, &str); 12] = [
    ("$50 Gift Card", "#F59E0B"),
    ("Free Ticket", "#10B981"),
    ("20% Off", "#4F46E5"),
    ("$10 Cashback", "#F43F5E"),
    ("Free Product", "#8B5CF6"),
    ("2x Points", "#EC4899"),
    ("Mystery Box", "#06B6D4"),
    ("Try Again", "#84CC16"),
    ("$25 Gift Card", "#6366F1"),
    ("Free Coffee", "#F97316"),
    ("$5 Discount", "#14B8A6"),
    ("Free Shipping", "#D946EF"),
];

/// 默认站点设置
pub const DEFAULT_SETTINGS: [(&str, &str); 3] = [
    (
        "background_color",
        "linear-gradient(to bottom, #4338CA, #3730A3)",
    ),
    ("site_title", "Prize Wheel Game"),
    ("meta_description", "Spin the wheel and win exciting prizes!"),
];

#[derive(Clone)]
pub struct SeedService {
    store: SharedStore,
}

impl SeedService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 首次启动时写入默认数据；已有数据不会被覆盖
    pub async fn seed_defaults(&self) -> AppResult<()> {
        if self.store.count_segments().await? == 0 {
            for (position, (text, color)) in DEFAULT_SEGMENTS.iter().enumerate() {
                self.store
                    .create_segment(NewSegment {
                        text: text.to_string(),
                        color: color.to_string(),
                        position: position as i32,
                        weight: 1,
                    })
                    .await?;
            }
            log::info!("Seeded {} default wheel segments", DEFAULT_SEGMENTS.len());
        }

        for (key, value) in DEFAULT_SETTINGS {
            if self.store.find_setting(key).await?.is_none() {
                self.store.upsert_setting(key, value).await?;
                log::info!("Seeded default setting {key}");
            }
        }

        Ok(())
    }
}
