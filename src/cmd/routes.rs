//! `portico routes`: validate and print the resolved route table.
//!
//! Builds the route table exactly as `run` would and prints it in
//! matching order, either human-readable or as JSON. Validation errors
//! are reported the same way and make the command fail.

use crate::cli::{RoutesArgs, RoutesFormat};
use crate::config::model::{Matching, Rewrite, Route};
use crate::error::GatewayError;
use crate::proxy::routing::RouteTable;

pub fn execute(args: &RoutesArgs) -> Result<(), GatewayError> {
    let config = args.services.to_config();

    let table = match RouteTable::new(config.routes()) {
        Ok(table) => table,
        Err(errors) => {
            match args.format {
                RoutesFormat::Text => {
                    eprintln!("\u{2717} route table has {} errors\n", errors.len());
                    for error in &errors {
                        eprintln!("{error}");
                    }
                }
                RoutesFormat::Json => {
                    let json_errors: Vec<serde_json::Value> = errors
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "route": e.route,
                                "field": e.field,
                                "message": e.message,
                                "suggestion": e.suggestion,
                            })
                        })
                        .collect();
                    println!(
                        "{}",
                        serde_json::json!({
                            "valid": false,
                            "errors": json_errors,
                        })
                    );
                }
            }
            return Err(GatewayError::ConfigValidation { errors });
        }
    };

    match args.format {
        RoutesFormat::Text => println!("\u{2713} {}", format_route_report(&table)),
        RoutesFormat::Json => println!(
            "{}",
            serde_json::json!({
                "valid": true,
                "routes": table.routes(),
            })
        ),
    }

    Ok(())
}

fn describe_rewrite(route: &Route) -> String {
    match &route.rewrite {
        Rewrite::Identity => "path unchanged".into(),
        Rewrite::StripPrefix => format!("drop '{}'", route.prefix),
        Rewrite::ReplacePrefix { with } => format!("'{}' -> '{with}'", route.prefix),
        Rewrite::Fixed { path } => format!("always '{path}'"),
    }
}

#[must_use]
pub fn format_route_report(table: &RouteTable) -> String {
    let mut lines = vec![format!("{} routes, in matching order\n", table.len())];

    for route in table.routes() {
        let pattern = match route.matching {
            Matching::Prefix => format!("{}/**", route.prefix),
            Matching::Exact => route.prefix.clone(),
        };
        lines.push(format!(
            "  {pattern}  -> {} ({})",
            route.base_url, route.service
        ));
        lines.push(format!("    methods: {}", route.methods.join(", ")));
        lines.push(format!("    rewrite: {}", describe_rewrite(route)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::GatewayConfig;

    #[test]
    fn report_lists_routes_most_specific_first() {
        let table = RouteTable::from_config(&GatewayConfig::default()).unwrap();
        let report = format_route_report(&table);

        assert!(report.starts_with("8 routes"));
        let profiles = report.find("/profiles-api/**").unwrap();
        let api = report.find("  /api/**").unwrap();
        assert!(profiles < api);
        assert!(report.contains("'/profiles-api' -> '/profiles'"));
        assert!(report.contains("always '/api/login'"));
    }
}
