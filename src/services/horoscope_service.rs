use crate::external::GeminiClient;
use crate::models::RashiReading;
use crate::utils::extract_json_array;
use chrono::{Datelike, NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// (英文名, 印地语名, 符号, 日期范围)
const RASHIS: [(&str, &str, &str, &str); 12] = [
    ("Aries", "मेष", "♈", "Mar 21 - Apr 19"),
    ("Taurus", "वृषभ", "♉", "Apr 20 - May 20"),
    ("Gemini", "मिथुन", "♊", "May 21 - Jun 20"),
    ("Cancer", "कर्क", "♋", "Jun 21 - Jul 22"),
    ("Leo", "सिंह", "♌", "Jul 23 - Aug 22"),
    ("Virgo", "कन्या", "♍", "Aug 23 - Sep 22"),
    ("Libra", "तुला", "♎", "Sep 23 - Oct 22"),
    ("Scorpio", "वृश्चिक", "♏", "Oct 23 - Nov 21"),
    ("Sagittarius", "धनु", "♐", "Nov 22 - Dec 21"),
    ("Capricorn", "मकर", "♑", "Dec 22 - Jan 19"),
    ("Aquarius", "कुम्भ", "♒", "Jan 20 - Feb 18"),
    ("Pisces", "मीन", "♓", "Feb 19 - Mar 20"),
];

const PREDICTIONS: [&str; 12] = [
    "Today brings positive energy for new beginnings. Your hard work will yield excellent results. Focus on personal growth and self-improvement.",
    "Financial opportunities are on the horizon. Be careful with investments and trust your intuition. A loved one may need your support today.",
    "Communication is key today. Express your feelings openly and honestly. Career advancement is possible if you stay focused.",
    "Health should be your priority today. Take time for meditation and self-care. Unexpected good news may arrive by evening.",
    "Romance is in the air. Single individuals may meet someone special. Married couples should plan quality time together.",
    "Professional life takes center stage. A challenging project will test your skills, but success is within reach. Stay confident.",
    "Travel plans may materialize. Family relationships need attention. Be flexible and open to changes in your routine.",
    "Creative energy flows freely today. Artists and writers will find inspiration. Financial matters look stable.",
    "Social connections bring joy. Networking opportunities abound. Don't hesitate to ask for help when needed.",
    "Inner peace is achievable today. Spiritual pursuits will bring clarity. Avoid conflicts and maintain harmony.",
    "Education and learning are favored. Students will excel in studies. Teachers will find satisfaction in their work.",
    "Property matters may need attention. Home improvements are well-starred. Spend quality time with family.",
];

const COLORS: [&str; 10] = [
    "Red", "Blue", "Green", "Yellow", "Orange", "Purple", "Pink", "White", "Gold", "Silver",
];

const PROMPT: &str = "Generate daily horoscope predictions for all 12 zodiac signs for today.
For each sign provide:
1. A 2-3 sentence prediction covering love, career, and health
2. Lucky color
3. Lucky number (1-9)

Format as JSON array with objects having: name, prediction, luckyColor, luckyNumber
Signs: Aries, Taurus, Gemini, Cancer, Leo, Virgo, Libra, Scorpio, Sagittarius, Capricorn, Aquarius, Pisces";

type DailyCache = Option<(NaiveDate, Vec<RashiReading>)>;

/// 每日运势。按 UTC 日期缓存，缓存锁在生成期间一直持有，
/// 并发未命中只会触发一次 AI 调用。
#[derive(Clone)]
pub struct HoroscopeService {
    gemini: GeminiClient,
    cache: Arc<Mutex<DailyCache>>,
}

impl HoroscopeService {
    pub fn new(gemini: GeminiClient) -> Self {
        Self {
            gemini,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn daily(&self) -> Vec<RashiReading> {
        let mut cache = self.cache.lock().await;
        self.populate(&mut cache).await
    }

    /// 清空当天缓存并重新生成
    pub async fn regenerate(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
        self.populate(&mut cache).await;
    }

    async fn populate(&self, cache: &mut DailyCache) -> Vec<RashiReading> {
        let today = Utc::now().date_naive();
        if let Some((date, readings)) = cache.as_ref() {
            if *date == today {
                return readings.clone();
            }
        }

        match self.generate_with_ai().await {
            Some(readings) => {
                *cache = Some((today, readings.clone()));
                readings
            }
            // 兜底结果不缓存，下次请求会再尝试 AI
            None => deterministic(today.ordinal() as usize),
        }
    }

    async fn generate_with_ai(&self) -> Option<Vec<RashiReading>> {
        if !self.gemini.is_enabled() {
            return None;
        }
        let text = match self.gemini.generate_text(PROMPT, 0.7, 2000).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Horoscope generation failed, using local readings: {}", e);
                return None;
            }
        };
        match extract_json_array(&text) {
            Some(items) => Some(merge_ai(&items)),
            None => {
                log::warn!("Horoscope response contained no JSON array");
                None
            }
        }
    }
}

fn reading(index: usize, prediction: String, lucky_color: String, lucky_number: String) -> RashiReading {
    let (name, name_hindi, symbol, date_range) = RASHIS[index];
    RashiReading {
        name: name.to_string(),
        name_hindi: name_hindi.to_string(),
        symbol: symbol.to_string(),
        date_range: date_range.to_string(),
        prediction,
        lucky_color,
        lucky_number,
    }
}

/// 本地生成：按年内第几天轮换预测、颜色与幸运数字
pub fn deterministic(day_of_year: usize) -> Vec<RashiReading> {
    (0..RASHIS.len())
        .map(|i| {
            reading(
                i,
                PREDICTIONS[(i + day_of_year) % PREDICTIONS.len()].to_string(),
                COLORS[(i + day_of_year) % COLORS.len()].to_string(),
                (((i + 1 + day_of_year) % 9) + 1).to_string(),
            )
        })
        .collect()
}

/// 按下标合并 AI 结果，缺失字段用默认值
pub fn merge_ai(items: &[Value]) -> Vec<RashiReading> {
    (0..RASHIS.len())
        .map(|i| {
            let item = items.get(i);
            let text = |keys: &[&str]| -> Option<String> {
                let item = item?;
                keys.iter().find_map(|k| match item.get(*k)? {
                    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
            };
            reading(
                i,
                text(&["prediction"]).unwrap_or_else(|| PREDICTIONS[i].to_string()),
                text(&["luckyColor", "lucky_color"]).unwrap_or_else(|| COLORS[i % COLORS.len()].to_string()),
                text(&["luckyNumber", "lucky_number"]).unwrap_or_else(|| ((i % 9) + 1).to_string()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use serde_json::json;

    #[test]
    fn test_deterministic_rotation() {
        let readings = deterministic(1);
        assert_eq!(readings.len(), 12);
        assert_eq!(readings[0].name, "Aries");
        assert_eq!(readings[0].prediction, PREDICTIONS[1]);
        assert_eq!(readings[0].lucky_color, "Blue");
        assert_eq!(readings[0].lucky_number, "3");
        assert_eq!(readings[11].name, "Pisces");
        assert_eq!(readings[11].prediction, PREDICTIONS[0]);
        assert_eq!(readings[11].lucky_color, "Green");
        assert_eq!(readings[11].lucky_number, "5");
    }

    #[test]
    fn test_merge_fills_missing_fields() {
        let items = vec![
            json!({"name": "Aries", "prediction": "Bold day.", "luckyColor": "Teal", "luckyNumber": 7}),
            json!({"name": "Taurus", "luckyNumber": "4"}),
        ];
        let readings = merge_ai(&items);
        assert_eq!(readings[0].prediction, "Bold day.");
        assert_eq!(readings[0].lucky_color, "Teal");
        assert_eq!(readings[0].lucky_number, "7");
        assert_eq!(readings[1].prediction, PREDICTIONS[1]);
        assert_eq!(readings[1].lucky_color, "Blue");
        assert_eq!(readings[1].lucky_number, "4");
        assert_eq!(readings[5].lucky_number, "6");
    }

    #[tokio::test]
    async fn test_daily_without_ai_uses_local_readings() {
        let service = HoroscopeService::new(GeminiClient::new(GeminiConfig::default()));
        let readings = service.daily().await;
        let expected = deterministic(Utc::now().date_naive().ordinal() as usize);
        assert_eq!(readings, expected);
        assert!(service.cache.lock().await.is_none());
    }
}
