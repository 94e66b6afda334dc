// HTML dashboard for a store snapshot. Pure function of its inputs; the
// handler owns the store access.

use std::fmt::Write;

use serde_json::Number;

use crate::config::ViewConfig;
use crate::storage::TeamReading;

const MISSING: &str = "n/a";

pub fn render_dashboard(view: &ViewConfig, readings: &[TeamReading]) -> String {
    let title = html_escape(&view.title);
    let mut rows = String::new();
    for r in readings {
        let _ = write!(
            rows,
            "            <tr>\n                <td>{}</td>\n                <td>{}</td>\n                <td>{}</td>\n                <td>{}</td>\n                <td>{}</td>\n            </tr>\n",
            html_escape(&r.team_id.to_string()),
            with_unit(r.temperature.as_ref(), "°C"),
            with_unit(r.humidity.as_ref(), "%"),
            r.timestamp.as_deref().map(html_escape).unwrap_or_else(|| MISSING.to_string()),
            r.report_count,
        );
    }

    format!(
        r#"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; text-align: center; }}
        table {{ margin-left: auto; margin-right: auto; border-collapse: collapse; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; }}
        th {{ background-color: #007bff; color: white; }}
        tr:nth-child(even) {{ background-color: #f2f2f2; }}
    </style>
    <script>
        setTimeout(function() {{ location.reload(); }}, {refresh_ms});
    </script>
</head>
<body>
    <h1>{title}</h1>
    <table>
        <tr>
            <th>Team #</th>
            <th>Temperature</th>
            <th>Humidity</th>
            <th>Timestamp</th>
            <th>Post Count</th>
        </tr>
{rows}    </table>
</body>
</html>
"#,
        refresh_ms = u64::from(view.refresh_seconds) * 1000,
    )
}

fn with_unit(value: Option<&Number>, unit: &str) -> String {
    match value {
        Some(n) => format!("{n}{unit}"),
        None => MISSING.to_string(),
    }
}

/// escape html special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TeamId;

    fn reading(
        team_id: TeamId,
        temperature: Option<Number>,
        humidity: Option<Number>,
        ts: Option<&str>,
        count: u64,
    ) -> TeamReading {
        TeamReading {
            team_id,
            temperature,
            humidity,
            timestamp: ts.map(str::to_string),
            report_count: count,
        }
    }

    #[test]
    fn renders_one_row_per_team_in_given_order() {
        let html = render_dashboard(
            &ViewConfig::default(),
            &[
                reading(TeamId::from(2), Number::from_f64(22.0), Some(41.into()), Some("12:05"), 2),
                reading(
                    TeamId::from(10),
                    Number::from_f64(19.25),
                    Some(38.into()),
                    Some("12:06"),
                    1,
                ),
            ],
        );
        let row2 = html.find("<td>2</td>").unwrap();
        let row10 = html.find("<td>10</td>").unwrap();
        assert!(row2 < row10);
        assert!(html.contains("<td>22.0°C</td>"));
        assert!(html.contains("<td>41%</td>"));
        assert!(html.contains("<td>12:05</td>"));
        assert!(html.contains("<td>19.25°C</td>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn absent_values_have_no_units() {
        let html = render_dashboard(
            &ViewConfig::default(),
            &[reading(TeamId::from(1), None, None, None, 3)],
        );
        assert!(html.contains("<td>n/a</td>"));
        assert!(!html.contains("n/a°C"));
        assert!(!html.contains("n/a%"));
        assert!(html.contains("<td>3</td>"));
    }

    #[test]
    fn reload_interval_follows_config() {
        let view = ViewConfig {
            refresh_seconds: 5,
            title: "Readings".into(),
        };
        let html = render_dashboard(&view, &[]);
        assert!(html.contains("location.reload(); }, 5000);"));
        assert!(html.contains("<title>Readings</title>"));
    }

    #[test]
    fn escapes_device_supplied_text() {
        let html = render_dashboard(
            &ViewConfig::default(),
            &[reading(TeamId::Name("<b>".into()), None, None, Some("<script>"), 1)],
        );
        assert!(html.contains("<td>&lt;b&gt;</td>"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(!html.contains("<td><script></td>"));
    }
}
