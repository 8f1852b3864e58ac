//! Prompt templates.
//!
//! Prompt text is product copy for Chinese-speaking teams and is kept
//! verbatim; tests pin the section markers the model relies on.

use pulse_core::Prompt;
use pulse_kpi::KpiSummary;
use pulse_skills::SkillPack;
use tracing::{debug, warn};

/// Stock request used when the user does not type one.
pub const DEFAULT_REQUEST: &str = "给我生成本周项目周报：总体进度、里程碑、Top 风险、按负责人统计、下周行动清单（按公司模板输出）。";

const DEFAULT_SYSTEM: &str = "你是一个项目管理助理。请根据用户需求和提供的数据，输出清晰的项目周报（Markdown）。\
优先基于事实数据，不要编造。若数据缺失请标注“待补充”。";

/// Prompt for a free-form report.
pub fn compose_default(request: &str, kpis: &KpiSummary, table_md: &str) -> Prompt {
    let kpis_json = kpis_json(kpis);
    let user = format!(
        "用户需求：\n{request}\n\n\
         数据（汇总KPIs，JSON）：\n{kpis_json}\n\n\
         数据（任务表前若干行，Markdown 表格）：\n{table_md}\n\n\
         请输出一份项目周报（Markdown）。"
    );
    debug!(variant = "default", user_len = user.len(), "composed prompt");
    Prompt::new(DEFAULT_SYSTEM, user)
}

/// Prompt that makes the model execute a skill pack.
pub fn compose_with_skill(
    request: &str,
    kpis: &KpiSummary,
    table_md: &str,
    skill: &SkillPack,
) -> Prompt {
    let system = format!(
        "你是企业内部的“周报生成技能（Skill）”执行器。\n\n\
         [Skill 指令]\n{}\n\n\
         [输出模板]\n{}\n\n\
         [质检 Rubric]\n{}\n\n\
         注意：\n\
         - 严格按模板输出，保留所有模板标题。\n\
         - 必须引用给定数据；不能编造项目、里程碑或指标。\n\
         - 对缺失字段用“待补充”标注；不要瞎猜。\n\
         - 输出必须是 Markdown（不加代码块围栏）。\n",
        skill.skill_md, skill.template_md, skill.rubric
    );

    let kpis_json = kpis_json(kpis);
    let user = format!(
        "用户需求：\n{request}\n\n\
         输入数据（汇总KPIs，JSON）：\n{kpis_json}\n\n\
         输入数据（任务表前若干行，Markdown 表格）：\n{table_md}\n\n\
         现在请按模板生成周报。"
    );
    debug!(variant = "skill", skill = %skill.name, user_len = user.len(), "composed prompt");
    Prompt::new(system, user)
}

/// KPI summary as two-space indented JSON with non-ASCII text kept as-is.
pub fn kpis_json(kpis: &KpiSummary) -> String {
    serde_json::to_string_pretty(kpis).unwrap_or_else(|e| {
        warn!(error = %e, "failed to serialize kpis");
        String::from("{}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pulse_core::{CanonicalTable, Status, TaskRecord};

    fn kpis() -> KpiSummary {
        let record = TaskRecord {
            project: Some("Alpha".into()),
            module: None,
            task: Some("接口联调".into()),
            owner: Some("张三".into()),
            status: Status::Blocked,
            priority: "P0".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            progress: 40.0,
            blocker: Some("等待测试环境".into()),
            risk: Some("高".into()),
        };
        let now = NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        pulse_kpi::compute(&CanonicalTable::new(vec![record]), now)
    }

    fn skill() -> SkillPack {
        SkillPack {
            name: "weekly_report".into(),
            skill_md: "SOP-STEPS".into(),
            template_md: "## 一、总体进度".into(),
            rubric: "grounding: 0.35".into(),
        }
    }

    #[test]
    fn default_prompt_embeds_data() {
        let p = compose_default(DEFAULT_REQUEST, &kpis(), "| project |");
        assert!(p.system.contains("项目管理助理"));
        assert!(p.system.contains("待补充"));
        assert!(p.user.starts_with("用户需求：\n给我生成本周项目周报"));
        assert!(p.user.contains("数据（汇总KPIs，JSON）：\n{"));
        assert!(p.user.contains("\"total_tasks\": 1"));
        assert!(p.user.contains("数据（任务表前若干行，Markdown 表格）：\n| project |"));
        assert!(p.user.ends_with("请输出一份项目周报（Markdown）。"));
    }

    #[test]
    fn json_keeps_non_ascii() {
        let json = kpis_json(&kpis());
        assert!(json.contains("\"owner\": \"张三\""));
        assert!(json.contains("\"score\": 8"));
        assert!(json.contains("\n  \"generated_at\": \"2024-03-06 09:00\""));
    }

    #[test]
    fn skill_prompt_has_sections_in_order() {
        let p = compose_with_skill("写周报", &kpis(), "| t |", &skill());
        let sop = p.system.find("[Skill 指令]\nSOP-STEPS").unwrap();
        let tpl = p.system.find("[输出模板]\n## 一、总体进度").unwrap();
        let rubric = p.system.find("[质检 Rubric]\ngrounding: 0.35").unwrap();
        assert!(sop < tpl && tpl < rubric);
        assert!(p.system.contains("不加代码块围栏"));
        assert!(p.user.contains("输入数据（汇总KPIs，JSON）"));
        assert!(p.user.ends_with("现在请按模板生成周报。"));
    }

    #[test]
    fn variants_differ() {
        let k = kpis();
        let a = compose_default("x", &k, "t");
        let b = compose_with_skill("x", &k, "t", &skill());
        assert_ne!(a.system, b.system);
        assert_ne!(a.user, b.user);
    }
}
