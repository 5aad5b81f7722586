use basket_core::config::{AppConfig, LoadOptions};
use basket_core::{CatalogView, Category, SortOrder, StorefrontHeader};
use serde::Serialize;

use crate::commands::{load_session, CommandResult, EXIT_CATALOG, EXIT_CONFIG};

#[derive(Debug, Serialize)]
struct CatalogListing {
    header: StorefrontHeader,
    view: CatalogView,
}

pub fn run(
    options: &LoadOptions,
    category: Option<Category>,
    order: SortOrder,
    json: bool,
) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "config_validation",
                error.to_string(),
                EXIT_CONFIG,
            )
        }
    };

    let session = match load_session(&config.catalog) {
        Ok(session) => session,
        Err(error) => {
            return CommandResult::failure(
                "catalog",
                "catalog_load",
                format!("{} ({error})", error.user_message()),
                EXIT_CATALOG,
            )
        }
    };

    let Some(catalog) = session.catalog() else {
        return CommandResult::failure(
            "catalog",
            "catalog_load",
            "catalog is not ready",
            EXIT_CATALOG,
        );
    };
    let listing = CatalogListing {
        header: StorefrontHeader::for_catalog(catalog),
        view: CatalogView::build(catalog, category, order),
    };

    if json {
        return match serde_json::to_string(&listing) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure("catalog", "serialization", error.to_string(), 1),
        };
    }

    CommandResult {
        exit_code: 0,
        output: format!("{}\n{}", listing.header.render(), listing.view.render()),
    }
}
