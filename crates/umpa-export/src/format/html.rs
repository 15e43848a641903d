//! Self-contained HTML reports.
//!
//! The single-track report shows the track metadata, the three summary
//! statistics and a chart.js line chart of the pitch series (chart.js is
//! loaded from a CDN). The comparison report embeds both track documents.

use super::json::TrackDocument;
use crate::{ExportError, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use umpa_analysis::{Comparison, PitchTrack, Side};

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

const REPORT_STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: linear-gradient(135deg, #0f0f1e 0%, #1a1a2e 100%);
            color: #e0e0e0;
            padding: 40px 20px;
        }
        .container {
            max-width: 900px;
            margin: 0 auto;
            background: rgba(255, 255, 255, 0.05);
            border: 1px solid rgba(255, 255, 255, 0.1);
            border-radius: 16px;
            padding: 40px;
        }
        .header { text-align: center; margin-bottom: 40px; padding-bottom: 20px;
                  border-bottom: 2px solid rgba(168, 85, 247, 0.3); }
        .header h1 { font-size: 32px; color: #a855f7; margin-bottom: 10px; }
        .header p { color: #888; font-size: 14px; }
        .info-section, .chart-section {
            background: rgba(255, 255, 255, 0.03);
            border: 1px solid rgba(255, 255, 255, 0.05);
            border-radius: 12px;
            padding: 20px;
            margin-bottom: 30px;
        }
        .info-row { display: flex; justify-content: space-between; padding: 10px 0;
                    border-bottom: 1px solid rgba(255, 255, 255, 0.05); }
        .info-row:last-child { border-bottom: none; }
        .info-label { font-weight: 600; color: #a855f7; }
        .stats-section { display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px;
                         margin-bottom: 30px; }
        .stat-card { background: rgba(168, 85, 247, 0.1); border: 1px solid rgba(168, 85, 247, 0.3);
                     border-radius: 12px; padding: 20px; text-align: center; }
        .stat-label { font-size: 12px; color: #888; margin-bottom: 8px; text-transform: uppercase;
                      letter-spacing: 1px; }
        .stat-value { font-size: 24px; font-weight: bold; color: #a855f7; }
        .chart-title { font-size: 18px; font-weight: 600; color: #a855f7; margin-bottom: 20px; }
        .footer { text-align: center; padding-top: 20px; color: #666; font-size: 12px;
                  border-top: 1px solid rgba(255, 255, 255, 0.1); }
        @media print {
            body { padding: 0; }
            .container { box-shadow: none; border: none; }
        }
"#;

const COMPARISON_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; padding: 20px; }
        h1 { color: #6b21a8; }
        h2 { margin-top: 25px; }
        pre { background: #f5f5f5; padding: 10px; border-radius: 6px; overflow-x: auto; }
        .error { color: #b91c1c; }
"#;

/// Escape text for an HTML element or attribute body.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON literal safe to embed in a `<script>` block.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Suggested download name: `<stem>_analysis_<YYYY-MM-DD>.html`.
pub fn report_file_name(track: &PitchTrack, date: NaiveDate) -> String {
    let name = track.file_name();
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    format!("{}_analysis_{}.html", stem, date.format("%Y-%m-%d"))
}

/// Single-track report.
pub fn report_html(track: &PitchTrack) -> Result<String> {
    let stats = track.statistics();
    let labels = script_json(track.time_labels())?;
    let data = script_json(track.pitches())?;

    let mut html = String::with_capacity(8 * 1024 + track.len() * 16);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>UMPA Pitch Analysis Report</title>
    <script src="{cdn}"></script>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>UMPA Pitch Analysis Report</h1>
            <p>Pitch measurement and analysis</p>
        </div>

        <div class="info-section">
            <div class="info-row"><span class="info-label">File</span><span class="info-value">{file}</span></div>
            <div class="info-row"><span class="info-label">Analyzed</span><span class="info-value">{date}</span></div>
            <div class="info-row"><span class="info-label">Duration</span><span class="info-value">{duration:.2}s</span></div>
            <div class="info-row"><span class="info-label">Sample rate</span><span class="info-value">{rate} Hz</span></div>
            <div class="info-row"><span class="info-label">Channels</span><span class="info-value">{channels}</span></div>
        </div>

        <div class="stats-section">
            <div class="stat-card"><div class="stat-label">Average pitch</div><div class="stat-value">{avg:.2} Hz</div></div>
            <div class="stat-card"><div class="stat-label">Max pitch</div><div class="stat-value">{max:.2} Hz</div></div>
            <div class="stat-card"><div class="stat-label">Min pitch</div><div class="stat-value">{min:.2} Hz</div></div>
        </div>

        <div class="chart-section">
            <div class="chart-title">Pitch over time</div>
            <canvas id="pitchChart"></canvas>
        </div>

        <div class="footer">
            <p>Generated by UMPA.</p>
        </div>
    </div>

    <script>
        const ctx = document.getElementById('pitchChart').getContext('2d');
        new Chart(ctx, {{
            type: 'line',
            data: {{
                labels: {labels},
                datasets: [{{
                    label: 'Pitch (Hz)',
                    data: {data},
                    borderColor: '#a855f7',
                    backgroundColor: 'rgba(168, 85, 247, 0.1)',
                    borderWidth: 2,
                    fill: true,
                    tension: 0.4,
                    pointRadius: 0,
                    pointHoverRadius: 6,
                }}]
            }},
            options: {{
                responsive: true,
                scales: {{
                    y: {{ beginAtZero: false, title: {{ display: true, text: 'Pitch (Hz)' }} }}
                }}
            }}
        }});
    </script>
</body>
</html>
"#,
        cdn = CHART_JS_CDN,
        style = REPORT_STYLE,
        file = escape_html(track.file_name()),
        date = track.timestamp().format("%Y-%m-%d %H:%M:%S UTC"),
        duration = track.duration_seconds(),
        rate = track.sample_rate(),
        channels = track.channel_count(),
        avg = stats.average,
        max = stats.maximum,
        min = stats.minimum,
        labels = labels,
        data = data,
    );
    Ok(html)
}

/// Comparison report with both track documents. A failed side shows its
/// error instead. Fails only when neither side has a track.
pub fn comparison_report_html(comparison: &Comparison) -> Result<String> {
    if comparison.axis_side().is_none() {
        return Err(ExportError::InvalidData(
            "comparison has no successful track".into(),
        ));
    }

    let mut html = String::with_capacity(4 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\" />\n    \
         <title>Pitch Comparison Report</title>\n    <style>{}</style>\n</head>\n<body>\n    \
         <h1>Pitch Comparison Report</h1>\n",
        COMPARISON_STYLE
    );

    for (index, side) in Side::BOTH.into_iter().enumerate() {
        match comparison.outcome(side) {
            Ok(track) => {
                let json = serde_json::to_string_pretty(&TrackDocument::new(track))?;
                let _ = write!(
                    html,
                    "\n    <h2>File {}: {}</h2>\n    <pre>{}</pre>\n",
                    index + 1,
                    escape_html(track.file_name()),
                    escape_html(&json)
                );
            }
            Err(e) => {
                let _ = write!(
                    html,
                    "\n    <h2>File {}</h2>\n    <p class=\"error\">Analysis failed: {}</p>\n",
                    index + 1,
                    escape_html(&e.to_string())
                );
            }
        }
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}
