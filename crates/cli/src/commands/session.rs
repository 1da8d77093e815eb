//! Replay a scripted picker session.
//!
//! The script is a YAML document with a list of steps. Rows are addressed by
//! their 1-based position in the list at the time the step runs.
//!
//! ```yaml
//! steps:
//!   - open: 1
//!   - search: mug
//!   - toggle_product: Blue Mug
//!   - toggle_variant: { product: Desk Lamp, variant: Brass }
//!   - commit
//!   - discount: { row: 1, action: add }
//!   - discount: { row: 1, action: { set_value: "15" } }
//!   - discount: { row: 1, action: { set_kind: flat } }
//!   - add_row
//!   - reorder: { from: 3, to: 1 }
//! ```
//!
//! Searches run against the live API unless a JSON catalog fixture is given.
//! The debounce window is simulated, so a `search` step never sleeps.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use product_picker::{
    DiscountAction, HttpProductSearch, InMemoryCatalog, PickerConfig, PickerController,
    PickerSettings, ProductSearchPort, ScrollViewport,
};
use product_picker_core::{
    DiscountKind, IdGenerator, Product, RandomIds, RowEntry, RowId, SequentialIds,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Step addresses a row past the end of the list.
    #[error("step {step}: no row #{row} (list has {len} rows)")]
    RowOutOfRange { step: usize, row: usize, len: usize },

    /// Step needs an open picker modal.
    #[error("step {0}: no picker is open")]
    PickerClosed(usize),

    /// Product title not among the current search results.
    #[error("step {step}: product not in results: {title}")]
    UnknownProduct { step: usize, title: String },

    /// Variant title not found under the product.
    #[error("step {step}: product {product} has no variant {variant}")]
    UnknownVariant {
        step: usize,
        product: String,
        variant: String,
    },
}

/// A parsed session script.
#[derive(Debug, Deserialize)]
pub struct SessionScript {
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<ScriptStep>,
}

/// One user gesture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    AddRow,
    Open(usize),
    Search(String),
    Scroll,
    ToggleProduct(String),
    ToggleVariant { product: String, variant: String },
    Commit,
    Cancel,
    Reorder { from: usize, to: usize },
    Discount { row: usize, action: ScriptDiscount },
}

/// Discount gesture as written in a script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptDiscount {
    Add,
    SetValue(String),
    SetKind(DiscountKind),
    Remove,
}

impl From<ScriptDiscount> for DiscountAction {
    fn from(action: ScriptDiscount) -> Self {
        match action {
            ScriptDiscount::Add => Self::Add,
            ScriptDiscount::SetValue(value) => Self::SetValue(value),
            ScriptDiscount::SetKind(kind) => Self::SetKind(kind),
            ScriptDiscount::Remove => Self::Remove,
        }
    }
}

/// Replay `script_path` and print the resulting rows.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, configuration is
/// invalid, or a step cannot be applied.
pub async fn run(
    script_path: &Path,
    catalog_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(script_path).await?;
    let script: SessionScript = serde_yaml::from_str(&content)?;
    info!(path = %script_path.display(), steps = script.steps.len(), "Loaded session script");

    let rows = if let Some(path) = catalog_path {
        let catalog = InMemoryCatalog::from_json(&tokio::fs::read_to_string(path).await?)?;
        info!(path = %path.display(), products = catalog.len(), "Using catalog fixture");
        let mut picker =
            PickerController::new(catalog, SequentialIds::new(), PickerSettings::default());
        replay(&mut picker, &script.steps).await?;
        picker.rows().as_slice().to_vec()
    } else {
        let config = PickerConfig::from_env()?;
        let client = HttpProductSearch::new(&config)?;
        // Live sessions get globally unique row ids.
        let mut picker = PickerController::new(client, RandomIds, config.settings());
        replay(&mut picker, &script.steps).await?;
        picker.rows().as_slice().to_vec()
    };

    log_discounted_prices(&rows);

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &rows)?;
    writeln!(stdout)?;
    Ok(())
}

/// Apply every step of a script in order.
///
/// # Errors
///
/// Returns the first step that cannot be applied. Steps that the engine
/// ignores in its current state (such as a discount edit on a hidden
/// discount) are logged and skipped.
pub async fn replay<P, G>(
    picker: &mut PickerController<P, G>,
    steps: &[ScriptStep],
) -> Result<(), ScriptError>
where
    P: ProductSearchPort,
    G: IdGenerator,
{
    // Simulated clock; each search step advances it past the debounce window.
    let mut clock = Instant::now();

    for (index, step) in steps.iter().enumerate() {
        let step_no = index + 1;
        match step {
            ScriptStep::AddRow => {
                picker.add_row();
            }
            ScriptStep::Open(row) => {
                let row_id = row_id_at(picker, step_no, *row)?;
                if let Some(request) = picker.open_picker(&row_id) {
                    picker.fetch_page(request).await;
                }
            }
            ScriptStep::Search(term) => {
                if !picker.type_search(term.as_str(), clock) {
                    return Err(ScriptError::PickerClosed(step_no));
                }
                clock += picker.settings().debounce;
                if let Some(request) = picker.poll_search(clock) {
                    picker.fetch_page(request).await;
                }
            }
            ScriptStep::Scroll => {
                if !picker.is_picker_open() {
                    return Err(ScriptError::PickerClosed(step_no));
                }
                if let Some(request) = picker.scroll(bottom_of_list()) {
                    picker.fetch_page(request).await;
                } else {
                    info!(step = step_no, "Scroll issued no request");
                }
            }
            ScriptStep::ToggleProduct(title) => {
                let product = find_result(picker, step_no, title)?;
                picker.toggle_product(&product);
            }
            ScriptStep::ToggleVariant { product, variant } => {
                let found = find_result(picker, step_no, product)?;
                let Some(chosen) = found.variants.iter().find(|v| &v.title == variant) else {
                    return Err(ScriptError::UnknownVariant {
                        step: step_no,
                        product: product.clone(),
                        variant: variant.clone(),
                    });
                };
                picker.toggle_variant(&found, chosen);
            }
            ScriptStep::Commit => {
                if !picker.commit() {
                    return Err(ScriptError::PickerClosed(step_no));
                }
            }
            ScriptStep::Cancel => {
                if !picker.close_picker() {
                    return Err(ScriptError::PickerClosed(step_no));
                }
            }
            ScriptStep::Reorder { from, to } => {
                let from = row_id_at(picker, step_no, *from)?;
                let to = row_id_at(picker, step_no, *to)?;
                picker.reorder(&from, &to);
            }
            ScriptStep::Discount { row, action } => {
                let row_id = row_id_at(picker, step_no, *row)?;
                if picker.update_discount(&row_id, action.clone().into()).is_none() {
                    warn!(step = step_no, row = %row_id, "Discount step ignored");
                }
            }
        }
    }
    Ok(())
}

fn row_id_at<P, G>(
    picker: &PickerController<P, G>,
    step: usize,
    row: usize,
) -> Result<RowId, ScriptError>
where
    P: ProductSearchPort,
    G: IdGenerator,
{
    let rows = picker.rows();
    row.checked_sub(1)
        .and_then(|index| rows.at(index))
        .map(|entry| entry.id.clone())
        .ok_or(ScriptError::RowOutOfRange {
            step,
            row,
            len: rows.len(),
        })
}

fn find_result<P, G>(
    picker: &PickerController<P, G>,
    step: usize,
    title: &str,
) -> Result<Product, ScriptError>
where
    P: ProductSearchPort,
    G: IdGenerator,
{
    if !picker.is_picker_open() {
        return Err(ScriptError::PickerClosed(step));
    }
    picker
        .results()
        .iter()
        .find(|p| p.title == title)
        .cloned()
        .ok_or_else(|| ScriptError::UnknownProduct {
            step,
            title: title.to_string(),
        })
}

/// A viewport scrolled all the way down.
const fn bottom_of_list() -> ScrollViewport {
    ScrollViewport {
        scroll_top: 900.0,
        client_height: 100.0,
        scroll_height: 1000.0,
    }
}

fn log_discounted_prices(rows: &[RowEntry]) {
    for (position, row) in rows.iter().enumerate() {
        if !row.discount.enabled {
            continue;
        }
        for variant in &row.variants {
            let Some(price) = variant.price_amount() else {
                continue;
            };
            match row.discount.apply(price) {
                Some(discounted) => info!(
                    row = position + 1,
                    product = %row.title,
                    variant = %variant.title,
                    %price,
                    %discounted,
                    "Discounted price"
                ),
                None => warn!(
                    row = position + 1,
                    product = %row.title,
                    value = %row.discount.value,
                    "Discount value is not a usable number"
                ),
            }
        }
    }
}
