use crate::error::{AppError, AppResult};
use crate::external::GeminiClient;
use crate::models::{
    BirthDetails, Compatibility, DetailedKundaliResponse, GunaBreakdown, KundaliChart,
    MilanRequest, MilanResponse, PlanetPositions,
};
use crate::utils::extract_json_object;
use chrono::{Datelike, Duration, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Value};

const RASHIS: [&str; 12] = [
    "Aries", "Taurus", "Gemini", "Cancer", "Leo", "Virgo", "Libra", "Scorpio", "Sagittarius",
    "Capricorn", "Aquarius", "Pisces",
];

const RASHIS_HINDI: [&str; 12] = [
    "मेष", "वृषभ", "मिथुन", "कर्क", "सिंह", "कन्या", "तुला", "वृश्चिक", "धनु", "मकर", "कुम्भ", "मीन",
];

const NAKSHATRAS: [&str; 27] = [
    "Ashwini", "Bharani", "Krittika", "Rohini", "Mrigashira", "Ardra", "Punarvasu", "Pushya",
    "Ashlesha", "Magha", "Purva Phalguni", "Uttara Phalguni", "Hasta", "Chitra", "Swati",
    "Vishakha", "Anuradha", "Jyeshtha", "Mula", "Purva Ashadha", "Uttara Ashadha", "Shravana",
    "Dhanishta", "Shatabhisha", "Purva Bhadrapada", "Uttara Bhadrapada", "Revati",
];

const MAX_GUNA: u32 = 36;
const DEFAULT_BIRTH_HOUR: u32 = 6;
const STATUS_PROCESSING: &str = "processing";

#[derive(Clone)]
pub struct KundaliService {
    gemini: GeminiClient,
}

impl KundaliService {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// 生成星盘：先本地计算，AI 可用时覆盖星座/星宿/上升/行星
    pub async fn generate(&self, birth: &BirthDetails) -> AppResult<KundaliChart> {
        let mut chart = deterministic_chart(birth)?;
        if let Some(parsed) = self.generate_with_ai(birth).await {
            apply_ai(&mut chart, &parsed);
        }
        Ok(chart)
    }

    pub async fn detailed(&self, birth: &BirthDetails) -> AppResult<DetailedKundaliResponse> {
        let chart = self.generate(birth).await?;
        Ok(DetailedKundaliResponse {
            chart,
            status: STATUS_PROCESSING.to_string(),
            message: "Your detailed Kundali report will be ready within 24 hours.".to_string(),
            estimated_delivery: estimated_delivery(),
            order_type: "DETAILED_KUNDALI".to_string(),
        })
    }

    /// 合盘
    pub async fn milan(&self, request: &MilanRequest) -> AppResult<MilanResponse> {
        let boy = self.generate(&request.boy).await?;
        let girl = self.generate(&request.girl).await?;
        let compatibility = compatibility(&boy, &girl);
        Ok(MilanResponse {
            boy,
            girl,
            compatibility,
            status: STATUS_PROCESSING.to_string(),
            message: "Your detailed Kundali Milan report will be ready within 24 hours."
                .to_string(),
            estimated_delivery: estimated_delivery(),
            order_type: "KUNDALI_MILAN".to_string(),
        })
    }

    async fn generate_with_ai(&self, birth: &BirthDetails) -> Option<Map<String, Value>> {
        if !self.gemini.is_enabled() {
            return None;
        }
        let prompt = format!(
            "Generate a Vedic astrology birth chart (Kundali) for:
Name: {}
Date of Birth: {}
Time of Birth: {}
Place of Birth: {}

Provide the following in JSON format:
1. rashi (moon sign)
2. nakshatra (birth star)
3. lagna (ascendant)
4. All 9 planets (sun, moon, mars, mercury, jupiter, venus, saturn, rahu, ketu) with their zodiac positions

Return only valid JSON with these fields.",
            birth.name, birth.date_of_birth, birth.time_of_birth, birth.place_of_birth
        );

        match self.gemini.generate_text(&prompt, 0.3, 1000).await {
            Ok(text) => extract_json_object(&text),
            Err(e) => {
                log::warn!("Kundali generation failed, using local chart: {}", e);
                None
            }
        }
    }
}

fn estimated_delivery() -> String {
    (Utc::now() + Duration::hours(24)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn rashi(index: usize) -> String {
    RASHIS[index % 12].to_string()
}

fn position(list: &[&str], name: &str) -> Option<usize> {
    list.iter().position(|n| n.eq_ignore_ascii_case(name))
}

/// 本地星盘：按出生月、日与小时推算
pub fn deterministic_chart(birth: &BirthDetails) -> AppResult<KundaliChart> {
    let date = NaiveDate::parse_from_str(birth.date_of_birth.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError("date_of_birth must be in YYYY-MM-DD format".to_string())
    })?;

    let month = date.month0() as usize;
    let day = date.day() as usize;
    let nakshatra = (day + month) % NAKSHATRAS.len();
    let hour = birth
        .time_of_birth
        .split(':')
        .next()
        .and_then(|h| h.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_BIRTH_HOUR);
    let lagna = (hour / 2) as usize % 12;

    Ok(KundaliChart {
        name: birth.name.clone(),
        date_of_birth: birth.date_of_birth.clone(),
        time_of_birth: birth.time_of_birth.clone(),
        place_of_birth: birth.place_of_birth.clone(),
        day_of_birth: date.format("%A").to_string(),
        rashi: rashi(month),
        rashi_hindi: RASHIS_HINDI[month].to_string(),
        nakshatra: NAKSHATRAS[nakshatra].to_string(),
        lagna: rashi(lagna),
        lagna_hindi: RASHIS_HINDI[lagna].to_string(),
        planets: PlanetPositions {
            sun: rashi(month),
            moon: rashi(month + nakshatra),
            mars: rashi(month + 3),
            mercury: rashi(month + 1),
            jupiter: rashi(month + 5),
            venus: rashi(month + 2),
            saturn: rashi(month + 7),
            rahu: rashi(month + 9),
            ketu: rashi(month + 3),
        },
    })
}

/// 用 AI 返回的字段覆盖本地结果，缺失的保持不变
fn apply_ai(chart: &mut KundaliChart, parsed: &Map<String, Value>) {
    let text = |obj: &Map<String, Value>, key: &str| -> Option<String> {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(r) = text(parsed, "rashi") {
        if let Some(i) = position(&RASHIS, &r) {
            chart.rashi_hindi = RASHIS_HINDI[i].to_string();
        }
        chart.rashi = r;
    }
    if let Some(n) = text(parsed, "nakshatra") {
        chart.nakshatra = n;
    }
    if let Some(l) = text(parsed, "lagna") {
        if let Some(i) = position(&RASHIS, &l) {
            chart.lagna_hindi = RASHIS_HINDI[i].to_string();
        }
        chart.lagna = l;
    }
    if let Some(planets) = parsed.get("planets").and_then(Value::as_object) {
        let p = &mut chart.planets;
        for (key, slot) in [
            ("sun", &mut p.sun),
            ("moon", &mut p.moon),
            ("mars", &mut p.mars),
            ("mercury", &mut p.mercury),
            ("jupiter", &mut p.jupiter),
            ("venus", &mut p.venus),
            ("saturn", &mut p.saturn),
            ("rahu", &mut p.rahu),
            ("ketu", &mut p.ketu),
        ] {
            if let Some(v) = text(planets, key) {
                *slot = v;
            }
        }
    }
}

/// 简化的八项合盘计分，满分 36
pub fn compatibility(boy: &KundaliChart, girl: &KundaliChart) -> Compatibility {
    let boy_nak = position(&NAKSHATRAS, &boy.nakshatra).unwrap_or(0);
    let girl_nak = position(&NAKSHATRAS, &girl.nakshatra).unwrap_or(0);
    let boy_rashi = position(&RASHIS, &boy.rashi).unwrap_or(0);
    let girl_rashi = position(&RASHIS, &girl.rashi).unwrap_or(0);
    let boy_lagna = position(&RASHIS, &boy.lagna).unwrap_or(0);
    let girl_lagna = position(&RASHIS, &girl.lagna).unwrap_or(0);

    let rashi_diff = boy_rashi.abs_diff(girl_rashi);
    let breakdown = GunaBreakdown {
        varna: 1.0,
        vasya: if boy.rashi == girl.rashi { 2.0 } else { 1.0 },
        tara: if boy_nak.abs_diff(girl_nak) % 9 <= 3 { 3.0 } else { 1.5 },
        yoni: ((boy_nak + girl_nak) % 4 + 1) as f64,
        graha_maitri: ((boy_rashi + girl_rashi) % 5 + 1) as f64,
        gana: ((boy_lagna + girl_lagna) % 6 + 1) as f64,
        bhakoot: if rashi_diff == 0 || rashi_diff == 6 { 0.0 } else { 7.0 },
        nadi: if boy.nakshatra != girl.nakshatra { 8.0 } else { 0.0 },
    };

    let sum = breakdown.varna
        + breakdown.vasya
        + breakdown.tara
        + breakdown.yoni
        + breakdown.graha_maitri
        + breakdown.gana
        + breakdown.bhakoot
        + breakdown.nadi;
    let total_guna = sum.min(MAX_GUNA as f64);
    let percentage = (total_guna / MAX_GUNA as f64 * 100.0).round() as u32;

    Compatibility {
        total_guna,
        max_guna: MAX_GUNA,
        percentage,
        recommendation: if total_guna >= 18.0 {
            "Compatible".to_string()
        } else {
            "Needs Consultation".to_string()
        },
        breakdown,
    }
}
