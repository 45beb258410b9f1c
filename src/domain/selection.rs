//! Model Selection
//!
//! Ranks fitted models by information criteria and elects a winner.
//! Criteria come from the fitting step; the selector only orders.

use crate::domain::volatility::fit::FittedModel;

/// Projection of a fitted model used for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub model: String,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
}

impl ComparisonRow {
    fn from_model(model: &FittedModel) -> Self {
        Self {
            model: model.name(),
            log_likelihood: model.log_likelihood,
            aic: model.aic,
            bic: model.bic,
        }
    }
}

/// Comparison table sorted ascending by AIC, ties broken by BIC.
/// Lower is better; the first row is the winner.
pub fn rank_models(models: &[FittedModel]) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = models.iter().map(ComparisonRow::from_model).collect();
    rows.sort_by(|a, b| a.aic.total_cmp(&b.aic).then(a.bic.total_cmp(&b.bic)));
    rows
}

/// The fitted model named by the first comparison row.
pub fn select_best<'a>(models: &'a [FittedModel]) -> Option<&'a FittedModel> {
    let rows = rank_models(models);
    let winner = rows.first()?;
    models.iter().find(|m| m.name() == winner.model)
}
