//! Objection rows annotated with their handling outcome

use crate::analysis::{AnalysisModel, Objection};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionRow {
    #[serde(flatten)]
    pub objection: Objection,
    pub handling_label: &'static str,
    pub status_icon: &'static str,
    pub icon_name: &'static str,
}

impl ObjectionRow {
    pub fn new(objection: &Objection) -> Self {
        let handled = objection.is_handled();
        Self {
            objection: objection.clone(),
            handling_label: handling_label(handled),
            status_icon: if handled { "check" } else { "close" },
            icon_name: if handled { "success" } else { "warning" },
        }
    }
}

/// Project objections in document order; the model is left untouched
pub fn project(model: &AnalysisModel) -> Vec<ObjectionRow> {
    model.objections().iter().map(ObjectionRow::new).collect()
}

pub fn handling_label(handled: bool) -> &'static str {
    if handled {
        "Handled Successfully"
    } else {
        "Needs Improvement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_section_yields_no_rows() {
        assert!(project(&AnalysisModel::default()).is_empty());
    }

    #[test]
    fn test_handled_objection() {
        let model = AnalysisModel::new().with_objection(Objection::new("Too expensive", true));
        let row = &project(&model)[0];

        assert_eq!(row.handling_label, "Handled Successfully");
        assert_eq!(row.status_icon, "check");
        assert_eq!(row.icon_name, "success");
        assert_eq!(row.objection.text(), "Too expensive");
    }

    #[test]
    fn test_unhandled_objection() {
        let model = AnalysisModel::new().with_objection(Objection::new("Need to think", false));
        let row = &project(&model)[0];

        assert_eq!(row.handling_label, "Needs Improvement");
        assert_eq!(row.status_icon, "close");
        assert_eq!(row.icon_name, "warning");
    }

    #[test]
    fn test_order_preserved_and_source_unchanged() {
        let model = AnalysisModel::new()
            .with_objection(Objection::new("first", false))
            .with_objection(Objection::new("second", true))
            .with_objection(Objection::new("third", false));
        let before = model.clone();

        let texts: Vec<String> = project(&model)
            .iter()
            .map(|r| r.objection.text().to_string())
            .collect();

        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(model, before);
    }

    #[test]
    fn test_row_serializes_pass_through_fields() {
        let mut objection = Objection::new("Timing", true);
        objection
            .extra
            .insert("category".to_string(), serde_json::json!("schedule"));

        let value = serde_json::to_value(ObjectionRow::new(&objection)).unwrap();
        assert_eq!(value["objectionText"], "Timing");
        assert_eq!(value["category"], "schedule");
        assert_eq!(value["handledEffectively"], true);
        assert_eq!(value["handlingLabel"], "Handled Successfully");
        assert_eq!(value["statusIcon"], "check");
        assert!(value.get("handling_label").is_none());
    }
}
