//! `laptoppos resources`: the invalidation table.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use laptoppos_core::{DASHBOARD_STATS_KEY, Resource};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ResourceEntry {
    resource: &'static str,
    label: &'static str,
    cache_keys: Vec<&'static str>,
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    resource: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Invalidates")]
    cache_keys: String,
}

/// Every tracked resource with the full set of keys a change to it
/// invalidates, dashboard catch-all included.
fn entries() -> Vec<ResourceEntry> {
    Resource::iter()
        .map(|resource| {
            let mut cache_keys = resource.cache_keys().to_vec();
            if resource != Resource::Dashboard {
                cache_keys.push(DASHBOARD_STATS_KEY);
            }
            ResourceEntry {
                resource: resource.into(),
                label: resource.label(),
                cache_keys,
            }
        })
        .collect()
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let data = entries();
    let rendered = output::render_list(
        &global.output,
        &data,
        |e| ResourceRow {
            resource: e.resource,
            label: e.label,
            cache_keys: e.cache_keys.join("\n"),
        },
        |e| e.resource.to_owned(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn entries_include_dashboard_catch_all() {
        let products = entries()
            .into_iter()
            .find(|e| e.resource == "products")
            .unwrap();
        assert_eq!(
            products.cache_keys,
            vec!["/api/products", "/api/products/low-stock", "/api/dashboard/stats"]
        );
    }

    #[test]
    fn dashboard_entry_has_single_key() {
        let dashboard = entries()
            .into_iter()
            .find(|e| e.resource == "dashboard")
            .unwrap();
        assert_eq!(dashboard.cache_keys, vec!["/api/dashboard/stats"]);
    }
}
