//! Interactive histogram rendering
//!
//! Renders the score distribution of a [`MetricValue`] as a
//! self-contained HTML page with a bin-count slider. Bin edges are
//! recomputed from the observed min/max on every slider change, in the
//! browser, with the same algorithm [`bin_counts`] uses server-side.

use std::path::Path;

use anyhow::{Context, Result, bail};

use textlens_core::MetricValue;

/// Smallest selectable number of bins
pub const MIN_BINS: u32 = 1;
/// Largest selectable number of bins
pub const MAX_BINS: u32 = 50;
/// Bin count shown before the user touches the slider
pub const DEFAULT_BINS: u32 = 10;

/// Partition `[floor(min), ceil(max)]` into `num_bins` equal-width
/// bins and count scores per bin. Returns the `num_bins + 1` edges and
/// the `num_bins` occupancy counts; the last bin is closed on both
/// sides. `num_bins` is clamped to `[MIN_BINS, MAX_BINS]`.
pub fn bin_counts(scores: &[f64], num_bins: u32) -> (Vec<f64>, Vec<usize>) {
    let num_bins = num_bins.clamp(MIN_BINS, MAX_BINS) as usize;
    if scores.is_empty() {
        return (vec![], vec![0; num_bins]);
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let start = min.floor();
    let mut end = max.ceil();
    // All-equal integer scores would collapse the range
    if end == start {
        end = start + 1.0;
    }
    let step = (end - start) / num_bins as f64;

    let edges: Vec<f64> = (0..=num_bins).map(|i| start + step * i as f64).collect();
    let mut counts = vec![0usize; num_bins];
    for &score in scores {
        let index = (((score - start) / step) as usize).min(num_bins - 1);
        counts[index] += 1;
    }

    (edges, counts)
}

/// Histogram renderer for metric values
pub struct Histogram;

impl Histogram {
    /// Render an interactive histogram page for the given metric value.
    ///
    /// `num_bins` sets the initial slider position and is clamped to
    /// `[MIN_BINS, MAX_BINS]`. An empty metric value is an error since
    /// there is nothing to plot.
    pub fn render(value: &MetricValue, num_bins: u32) -> Result<String> {
        if value.is_empty() {
            bail!("cannot plot '{}': no scores", value.metric_name());
        }
        let num_bins = num_bins.clamp(MIN_BINS, MAX_BINS);
        let scores_json = serde_json::to_string(value.metric_values())
            .context("failed to serialize scores")?;

        let mut html = String::new();
        html.push_str(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
"#,
        );
        html.push_str(&format!(
            "    <title>{} distribution</title>\n",
            value.metric_name()
        ));
        html.push_str(
            r#"    <style>
        :root {
            --bg-primary: #1a1a2e;
            --bg-secondary: #16213e;
            --bar: #e94560;
            --text-primary: #eee;
            --text-secondary: #aaa;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            padding: 2rem;
        }
        .container { max-width: 900px; margin: 0 auto; }
        h1 { margin-bottom: 1rem; }
        .controls { margin-bottom: 1.5rem; }
        .controls label { color: var(--text-secondary); margin-right: 0.5rem; }
        .controls output { font-weight: 600; margin-left: 0.5rem; }
        #chart {
            display: flex;
            align-items: flex-end;
            gap: 2px;
            height: 320px;
            background: var(--bg-secondary);
            border-radius: 8px;
            padding: 1rem;
        }
        .bar { background: var(--bar); flex: 1; position: relative; min-height: 1px; }
        .bar:hover::after {
            content: attr(data-label);
            position: absolute;
            bottom: 100%;
            left: 50%;
            transform: translateX(-50%);
            background: var(--bg-primary);
            color: var(--text-primary);
            padding: 2px 6px;
            border-radius: 4px;
            font-size: 0.75rem;
            white-space: nowrap;
        }
        .axis { display: flex; justify-content: space-between; color: var(--text-secondary); font-size: 0.75rem; margin-top: 0.25rem; }
    </style>
</head>
<body>
    <div class="container">
"#,
        );
        html.push_str(&format!(
            "        <h1>{} distribution</h1>\n",
            value.metric_name()
        ));
        html.push_str(&format!(
            r#"        <div class="controls">
            <label for="num_bins">Number of bins:</label>
            <input type="range" id="num_bins" min="{MIN_BINS}" max="{MAX_BINS}" step="1" value="{num_bins}">
            <output id="num_bins_value">{num_bins}</output>
        </div>
        <div id="chart"></div>
        <div class="axis"><span id="axis_min"></span><span id="axis_max"></span></div>
    </div>
    <script>
"#,
        ));
        html.push_str(&format!("        const scores = {scores_json};\n"));
        html.push_str(
            r#"        const chart = document.getElementById('chart');
        const slider = document.getElementById('num_bins');
        const sliderValue = document.getElementById('num_bins_value');

        // Same binning as the server: floor/ceil endpoints, equal-width
        // bins, last bin closed on both sides.
        function rebin(numBins) {
            const start = Math.floor(Math.min(...scores));
            let end = Math.ceil(Math.max(...scores));
            if (end === start) { end = start + 1; }
            const step = (end - start) / numBins;

            const counts = new Array(numBins).fill(0);
            for (const score of scores) {
                const index = Math.min(Math.floor((score - start) / step), numBins - 1);
                counts[index] += 1;
            }

            const maxCount = Math.max(...counts, 1);
            chart.innerHTML = '';
            counts.forEach((count, i) => {
                const bar = document.createElement('div');
                bar.className = 'bar';
                bar.style.height = (count / maxCount * 100) + '%';
                const lo = (start + step * i).toFixed(2);
                const hi = (start + step * (i + 1)).toFixed(2);
                const close = i === numBins - 1 ? ']' : ')';
                bar.dataset.label = '[' + lo + ', ' + hi + close + ': ' + count;
                chart.appendChild(bar);
            });
            document.getElementById('axis_min').textContent = start;
            document.getElementById('axis_max').textContent = end;
        }

        slider.addEventListener('input', () => {
            sliderValue.textContent = slider.value;
            rebin(parseInt(slider.value, 10));
        });
        rebin(parseInt(slider.value, 10));
    </script>
</body>
</html>
"#,
        );

        Ok(html)
    }

    /// Render the histogram and write it to a file
    pub fn write_html(value: &MetricValue, num_bins: u32, path: impl AsRef<Path>) -> Result<()> {
        let html = Self::render(value, num_bins)?;
        std::fs::write(path.as_ref(), html)
            .with_context(|| format!("failed to write {}", path.as_ref().display()))?;
        Ok(())
    }
}
