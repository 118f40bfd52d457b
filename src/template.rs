//! テンプレートのトークン置換
//!
//! `${date}` / `${time}` / `${timeValue}` を現在時刻で置き換える。

use std::sync::OnceLock;

use chrono::{DateTime, Local};
use regex::{Captures, Regex};

pub const DATE_TOKEN: &str = "${date}";
pub const TIME_TOKEN: &str = "${time}";
pub const TIME_VALUE_TOKEN: &str = "${timeValue}";

/// 現在時刻の取得元
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// システム時計
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// 固定時刻（テスト向け）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// 1イベント分のトークン値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValues {
    /// `YYYYMMDD`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    /// エポックミリ秒
    pub time_value: String,
}

impl TokenValues {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        time_value: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            time_value: time_value.into(),
        }
    }

    pub fn at(now: DateTime<Local>) -> Self {
        Self {
            date: now.format("%Y%m%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            time_value: now.timestamp_millis().to_string(),
        }
    }

    pub fn capture<C: Clock + ?Sized>(clock: &C) -> Self {
        Self::at(clock.now())
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "date" => Some(&self.date),
            "time" => Some(&self.time),
            "timeValue" => Some(&self.time_value),
            _ => None,
        }
    }
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\$\{(date|time|timeValue)\}").expect("valid token regex"))
}

/// すべての出現箇所を置換する
pub fn substitute_all(template: &str, tokens: &TokenValues) -> String {
    token_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            tokens.lookup(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

/// 各トークンの最初の出現箇所のみ置換する
pub fn substitute_first(template: &str, tokens: &TokenValues) -> String {
    template
        .replacen(DATE_TOKEN, &tokens.date, 1)
        .replacen(TIME_TOKEN, &tokens.time, 1)
        .replacen(TIME_VALUE_TOKEN, &tokens.time_value, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tokens() -> TokenValues {
        TokenValues::new("20240305", "09:07:03", "1709597223000")
    }

    #[test]
    fn substitute_all_replaces_every_occurrence() {
        let out = substitute_all("${date} ${date} ${time} @${timeValue}", &tokens());
        assert_eq!(out, "20240305 20240305 09:07:03 @1709597223000");
    }

    #[test]
    fn substitute_first_replaces_only_first_occurrence() {
        let out = substitute_first("${date}-${date} ${time} ${time}", &tokens());
        assert_eq!(out, "20240305-${date} 09:07:03 ${time}");
    }

    #[test]
    fn unknown_tokens_are_left_untouched() {
        assert_eq!(substitute_all("${user} ${Date}", &tokens()), "${user} ${Date}");
        assert_eq!(substitute_first("${user}", &tokens()), "${user}");
    }

    #[test]
    fn time_token_does_not_swallow_time_value() {
        let out = substitute_first("${timeValue}", &tokens());
        assert_eq!(out, "1709597223000");
    }

    #[test]
    fn values_are_zero_padded() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 9, 7, 3).single().unwrap();
        let values = TokenValues::capture(&FixedClock(now));
        assert_eq!(values.date, "20240305");
        assert_eq!(values.time, "09:07:03");
        assert_eq!(values.time_value, now.timestamp_millis().to_string());
    }
}
