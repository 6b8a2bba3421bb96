//! 计费规则：纯函数，不访问数据库

use crate::entities::{ConsultationType, Plan};
use crate::models::{PlanPricing, ReportPrices, ReportType};

/// 国际用户费率按 USD 定价后折算 INR
const USD_TO_INR: i64 = 80;
const PAISE_PER_RUPEE: i64 = 100;
const CENTS_PER_DOLLAR: i64 = 100;

/// 每分钟费率（paise）
pub fn rate_per_minute(plan: Plan, is_international: bool) -> i64 {
    let rupees = match (plan, is_international) {
        (Plan::Premium, false) => 70,
        (Plan::Premium, true) => 5 * USD_TO_INR,
        (Plan::Basic | Plan::Freemium, false) => 10,
        (Plan::Basic | Plan::Freemium, true) => 2 * USD_TO_INR,
    };
    rupees * PAISE_PER_RUPEE
}

/// 新用户首次免费咨询时长
pub fn free_minutes(consultation_type: ConsultationType) -> i64 {
    match consultation_type {
        ConsultationType::Chat => 5,
        ConsultationType::Call => 3,
    }
}

pub fn is_international(country: &str) -> bool {
    !country.trim().eq_ignore_ascii_case("india")
}

/// 展示用价格表，金额为展示货币的最小单位
pub fn plan_pricing(plan: Plan, is_international: bool) -> PlanPricing {
    let (currency, unit) = if is_international {
        ("USD", CENTS_PER_DOLLAR)
    } else {
        ("INR", PAISE_PER_RUPEE)
    };

    match plan {
        Plan::Freemium => PlanPricing {
            plan: plan.to_string(),
            min_rate: 0,
            currency: currency.to_string(),
            reports: None,
            chat_limit: Some(free_minutes(ConsultationType::Chat)),
            call_limit: Some(free_minutes(ConsultationType::Call)),
        },
        Plan::Basic => PlanPricing {
            plan: plan.to_string(),
            min_rate: (if is_international { 2 } else { 10 }) * unit,
            currency: currency.to_string(),
            reports: None,
            chat_limit: None,
            call_limit: None,
        },
        Plan::Premium => PlanPricing {
            plan: plan.to_string(),
            min_rate: (if is_international { 5 } else { 70 }) * unit,
            currency: currency.to_string(),
            reports: Some(premium_reports(is_international)),
            chat_limit: None,
            call_limit: None,
        },
    }
}

fn premium_reports(is_international: bool) -> ReportPrices {
    if is_international {
        ReportPrices {
            personal: 11 * CENTS_PER_DOLLAR,
            milan: 21 * CENTS_PER_DOLLAR,
        }
    } else {
        ReportPrices {
            personal: 551 * PAISE_PER_RUPEE,
            milan: 2100 * PAISE_PER_RUPEE,
        }
    }
}

/// PREMIUM 报告价格及币种
pub fn report_price(report_type: ReportType, is_international: bool) -> (i64, &'static str) {
    let prices = premium_reports(is_international);
    let amount = match report_type {
        ReportType::Personal => prices.personal,
        ReportType::Milan => prices.milan,
    };
    let currency = if is_international { "USD" } else { "INR" };
    (amount, currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table() {
        assert_eq!(rate_per_minute(Plan::Premium, false), 7_000);
        assert_eq!(rate_per_minute(Plan::Premium, true), 40_000);
        assert_eq!(rate_per_minute(Plan::Basic, false), 1_000);
        assert_eq!(rate_per_minute(Plan::Basic, true), 16_000);
        assert_eq!(rate_per_minute(Plan::Freemium, false), 1_000);
    }

    #[test]
    fn test_unknown_plan_falls_back_to_basic() {
        let plan = Plan::parse("GOLD");
        assert_eq!(plan, Plan::Basic);
        assert_eq!(rate_per_minute(plan, false), rate_per_minute(Plan::Basic, false));
        assert_eq!(Plan::parse(" premium "), Plan::Premium);
    }

    #[test]
    fn test_free_minutes() {
        assert_eq!(free_minutes(ConsultationType::Chat), 5);
        assert_eq!(free_minutes(ConsultationType::Call), 3);
    }

    #[test]
    fn test_is_international() {
        assert!(!is_international("India"));
        assert!(!is_international(" india "));
        assert!(is_international("Nepal"));
        assert!(is_international(""));
    }

    #[test]
    fn test_plan_pricing_reports() {
        let domestic = plan_pricing(Plan::Premium, false);
        assert_eq!(domestic.currency, "INR");
        assert_eq!(
            domestic.reports,
            Some(ReportPrices {
                personal: 55_100,
                milan: 210_000
            })
        );

        let intl = plan_pricing(Plan::Premium, true);
        assert_eq!(intl.currency, "USD");
        assert_eq!(intl.min_rate, 500);
        assert_eq!(intl.reports.map(|r| r.milan), Some(2_100));

        let free = plan_pricing(Plan::Freemium, false);
        assert_eq!(free.min_rate, 0);
        assert_eq!(free.chat_limit, Some(5));
        assert_eq!(free.call_limit, Some(3));
    }

    #[test]
    fn test_report_price() {
        assert_eq!(report_price(ReportType::Personal, false), (55_100, "INR"));
        assert_eq!(report_price(ReportType::Milan, true), (2_100, "USD"));
    }
}
