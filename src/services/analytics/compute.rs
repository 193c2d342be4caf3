//! 分析指标计算，不依赖存储

use crate::config::AnalyticsConfig;
use crate::models::analytics::responses::GradeBucket;

/// 成绩区间，从高到低
pub const GRADE_BUCKETS: [&str; 5] = ["90-100", "80-89", "70-79", "60-69", "0-59"];

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 得分占满分的百分比
pub fn percentage(score: f64, max_score: f64) -> Option<f64> {
    (max_score > 0.0).then(|| score / max_score * 100.0)
}

pub fn bucket_for(percentage: f64) -> &'static str {
    match percentage {
        p if p >= 90.0 => GRADE_BUCKETS[0],
        p if p >= 80.0 => GRADE_BUCKETS[1],
        p if p >= 70.0 => GRADE_BUCKETS[2],
        p if p >= 60.0 => GRADE_BUCKETS[3],
        _ => GRADE_BUCKETS[4],
    }
}

/// 全部区间都会出现，计数可以为 0
pub fn grade_distribution(percentages: &[f64]) -> Vec<GradeBucket> {
    GRADE_BUCKETS
        .iter()
        .map(|range| GradeBucket {
            range: (*range).to_string(),
            count: percentages
                .iter()
                .filter(|p| bucket_for(**p) == *range)
                .count() as i64,
        })
        .collect()
}

pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round2(values.iter().sum::<f64>() / values.len() as f64))
}

/// completed / total × 100，total 为 0 时为 0
pub fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(completed as f64 / total as f64 * 100.0)
}

/// 风险原因，空表示不在风险名单中
pub fn at_risk_reasons(
    average_grade: Option<f64>,
    attendance_rate: Option<f64>,
    missing_assignments: i64,
    config: &AnalyticsConfig,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if let Some(grade) = average_grade
        && grade < config.at_risk_grade_threshold
    {
        reasons.push(format!(
            "Average grade {grade:.2}% is below {}%",
            config.at_risk_grade_threshold
        ));
    }
    if let Some(rate) = attendance_rate
        && rate < config.at_risk_attendance_threshold
    {
        reasons.push(format!(
            "Attendance rate {rate:.2}% is below {}%",
            config.at_risk_attendance_threshold
        ));
    }
    if missing_assignments >= config.at_risk_missing_threshold {
        reasons.push(format!(
            "{missing_assignments} past-due assignments not submitted"
        ));
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket_for(100.0), "90-100");
        assert_eq!(bucket_for(90.0), "90-100");
        assert_eq!(bucket_for(89.99), "80-89");
        assert_eq!(bucket_for(60.0), "60-69");
        assert_eq!(bucket_for(59.5), "0-59");
        assert_eq!(bucket_for(0.0), "0-59");
    }

    #[test]
    fn test_grade_distribution_keeps_empty_buckets() {
        let distribution = grade_distribution(&[95.0, 91.0, 72.0, 10.0]);
        let counts: Vec<i64> = distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 0, 1, 0, 1]);
        assert_eq!(distribution[4].range, "0-59");
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(2, 3), 66.67);
        assert_eq!(completion_rate(6, 6), 100.0);
    }

    #[test]
    fn test_percentage_and_average() {
        assert_eq!(percentage(45.0, 50.0), Some(90.0));
        assert_eq!(percentage(1.0, 0.0), None);
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[80.0, 85.0, 90.5]), Some(85.17));
    }

    #[test]
    fn test_at_risk_reasons() {
        let config = AnalyticsConfig::default();

        assert!(at_risk_reasons(Some(80.0), Some(90.0), 0, &config).is_empty());
        // 没有成绩和考勤记录时只看缺交
        assert!(at_risk_reasons(None, None, 1, &config).is_empty());

        let reasons = at_risk_reasons(Some(40.0), Some(50.0), 2, &config);
        assert_eq!(reasons.len(), 3);
        assert!(reasons[0].starts_with("Average grade"));
        assert!(reasons[1].starts_with("Attendance rate"));
        assert!(reasons[2].contains("past-due"));
    }
}
