use fasting_core::FastingPlan;

pub fn render_plan(plan: &FastingPlan) -> String {
    let premium = if plan.is_premium { " (Premium)" } else { "" };
    format!(
        "{} - {} hours{premium}\n  {}\n  id: {}",
        plan.name, plan.duration, plan.description, plan.id
    )
}

pub fn render_list(plans: &[FastingPlan]) -> String {
    if plans.is_empty() {
        return "Fasting Plans\n  (none)".to_string();
    }
    let rows: Vec<String> = plans.iter().map(render_plan).collect();
    format!("Fasting Plans\n{}", rows.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn plan(is_premium: bool) -> FastingPlan {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        FastingPlan {
            id: Uuid::nil(),
            name: "16:8".to_string(),
            duration: 16.0,
            description: "skip breakfast".to_string(),
            is_premium,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn render_plan_marks_premium() {
        assert_eq!(
            render_plan(&plan(true)),
            "16:8 - 16 hours (Premium)\n  skip breakfast\n  id: 00000000-0000-0000-0000-000000000000"
        );
        assert!(!render_plan(&plan(false)).contains("Premium"));
    }

    #[test]
    fn render_list_empty() {
        assert_eq!(render_list(&[]), "Fasting Plans\n  (none)");
    }

    #[test]
    fn fractional_durations_are_kept() {
        let mut plan = plan(false);
        plan.duration = 22.5;
        assert!(render_plan(&plan).starts_with("16:8 - 22.5 hours"));
    }
}
