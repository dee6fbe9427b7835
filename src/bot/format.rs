//! User-facing reply strings (Korean + emoji), one function per reply.
//!
//! Kept apart from the dispatch logic so the wording can change without
//! touching game rules, and so tests can assert on the exact surface.

use crate::game::economy::{
    EnhanceOutcome, ItemReport, RankReport, SaleReceipt, ATTENDANCE_REWARD, ENHANCE_COST,
    SELLABLE_LEVEL,
};
use crate::game::market::REROLL_MINUTES;

pub fn attendance_done() -> String {
    format!("💰 출석 완료! {ATTENDANCE_REWARD} 골드를 획득했습니다.")
}

pub fn attendance_already() -> String {
    "❌ 오늘은 이미 출석을 했습니다.".to_string()
}

pub fn wallet(gold: u64) -> String {
    format!("💰 현재 보유 골드: {gold}")
}

pub fn missing_item_name_enhance() -> String {
    "❗ 강화할 물품 이름을 입력해주세요.".to_string()
}

pub fn missing_item_name_sell() -> String {
    "❗ 판매할 물품 이름을 입력해주세요.".to_string()
}

pub fn insufficient_funds() -> String {
    format!("❌ 골드가 부족합니다. (필요 골드: {ENHANCE_COST})")
}

pub fn enhance_result(item_name: &str, outcome: &EnhanceOutcome) -> String {
    match outcome {
        EnhanceOutcome::Success { level, chance } => format!(
            "✨ 강화 성공!\n🗡️ {item_name} → +{level}\n🎯 성공 확률: {chance}%"
        ),
        EnhanceOutcome::Destroyed => format!("💥 {item_name}이 파괴되었습니다."),
    }
}

pub fn no_such_item(item_name: &str) -> String {
    format!("❌ {item_name}은(는) 강화 기록이 없습니다.")
}

pub fn item_info(item_name: &str, report: &ItemReport) -> String {
    let price_line = match report.price {
        Some(price) => price.to_string(),
        None => format!("{SELLABLE_LEVEL}강 이상부터 판매 가능"),
    };
    format!(
        "📊 {item_name} 정보\n🗡️ 강화 단계: +{}\n🎯 성공 확률: {}%\n💸 판매 가격: {}",
        report.level, report.chance, price_line
    )
}

pub fn ranking(report: &RankReport) -> String {
    format!(
        "🏆 **역대 최고 강화 기록**\n👤 {}\n🗡️ {} (+{})\n\n⭐ **현재 서버 최고 강화 아이템**\n👤 {}\n🗡️ {} (+{})",
        report.all_time.username,
        report.all_time.item_name,
        report.all_time.level,
        report.current.username,
        report.current.item_name,
        report.current.level
    )
}

pub fn not_owned(item_name: &str) -> String {
    format!("❌ {item_name}은(는) 보유하고 있지 않습니다.")
}

pub fn not_sellable() -> String {
    format!("❌ {SELLABLE_LEVEL}강 이상 아이템만 판매할 수 있습니다.")
}

pub fn sold(item_name: &str, receipt: &SaleReceipt) -> String {
    format!(
        "💸 판매 완료!\n🗡️ {item_name} (+{})\n📈 시세 x{}\n💰 획득 골드: {}",
        receipt.level, receipt.rate, receipt.price
    )
}

pub fn market(rate: f64) -> String {
    format!("📊 현재 판매 시세\n📈 배율: x{rate}\n⏱️ {REROLL_MINUTES}분마다 자동 변동")
}

pub fn help() -> String {
    "📖 명령어 안내\n\n💰 돈\n-출석 / -지갑 / 채팅 1회당 10골드\n\n⚔️ 강화\n-강화 [아이템]\n-정보 [아이템]\n\n💸 판매\n-판매 [아이템] (5강 이상)\n-시세\n\n🏆 랭킹\n-랭킹"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::economy::BestRecord;

    #[test]
    fn enhance_replies_carry_level_and_chance() {
        let success = EnhanceOutcome::Success {
            level: 3,
            chance: 65,
        };
        let text = enhance_result("검", &success);
        assert!(text.contains("검 → +3"));
        assert!(text.contains("65%"));
        assert!(enhance_result("검", &EnhanceOutcome::Destroyed).contains("파괴"));
    }

    #[test]
    fn info_shows_sentinel_below_sellable_level() {
        let report = ItemReport {
            level: 4,
            chance: 60,
            price: None,
        };
        assert!(item_info("검", &report).contains("5강 이상부터 판매 가능"));

        let report = ItemReport {
            level: 5,
            chance: 55,
            price: Some(2657),
        };
        assert!(item_info("검", &report).contains("2657"));
    }

    #[test]
    fn ranking_lists_both_records() {
        let report = RankReport {
            all_time: BestRecord {
                username: "alice".into(),
                item_name: "검".into(),
                level: 12,
            },
            current: BestRecord::default(),
        };
        let text = ranking(&report);
        assert!(text.contains("alice"));
        assert!(text.contains("(+12)"));
        assert!(text.contains("없음"));
    }

    #[test]
    fn market_reply_shows_rate_and_cadence() {
        let text = market(1.5);
        assert!(text.contains("x1.5"));
        assert!(text.contains("30분"));
    }
}
