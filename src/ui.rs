use crate::models::MOOD_CATALOG;
use chrono::NaiveDate;

pub struct IndexView<'a> {
    pub today: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub error: Option<&'a str>,
}

pub fn render_index(view: &IndexView<'_>) -> String {
    let (status_type, status) = match view.error {
        Some(message) => ("error", message),
        None => ("", ""),
    };

    INDEX_HTML
        .replace("{{TODAY}}", &view.today.to_string())
        .replace("{{START}}", &view.start.to_string())
        .replace("{{END}}", &view.end.to_string())
        .replace("{{BLOCKED}}", if view.error.is_some() { "true" } else { "false" })
        .replace("{{STATUS_TYPE}}", status_type)
        .replace("{{STATUS}}", status)
        .replace("{{MOOD_OPTIONS}}", &mood_options())
}

fn mood_options() -> String {
    MOOD_CATALOG
        .iter()
        .enumerate()
        .map(|(idx, mood)| {
            format!(
                r#"<label class="mood-option" title="{label}"><input type="radio" name="mood" value="{symbol}"{checked} /><span>{symbol}</span></label>"#,
                label = mood.label(),
                symbol = mood.symbol(),
                checked = if idx == 0 { " checked" } else { "" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Queue Mood Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3f8;
      --bg-2: #c9dcef;
      --ink: #24303b;
      --accent: #ff8a4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3ecf5 60%, #f4f7fa 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .range {
      display: flex;
      flex-wrap: wrap;
      gap: 16px;
      align-items: end;
    }

    .range label,
    .log label.field {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #7a746d;
    }

    input[type="date"],
    input[type="text"] {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
      color: var(--ink);
    }

    .layout {
      display: grid;
      grid-template-columns: minmax(220px, 1fr) 2fr;
      gap: 24px;
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 16px;
      align-content: start;
    }

    .moods {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
    }

    .mood-option input {
      position: absolute;
      opacity: 0;
    }

    .mood-option span {
      display: inline-grid;
      place-items: center;
      width: 48px;
      height: 48px;
      font-size: 1.6rem;
      border-radius: 14px;
      border: 2px solid transparent;
      background: rgba(47, 72, 88, 0.06);
      cursor: pointer;
    }

    .mood-option input:checked + span {
      border-color: var(--accent);
      background: white;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(255, 138, 74, 0.3);
    }

    button.secondary {
      background: var(--accent-2);
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
    }

    #chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-bar {
      fill: var(--accent-2);
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .chart-symbol {
      font-size: 22px;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .caption {
      margin: 0;
      color: #6f6a65;
      font-size: 0.85rem;
    }

    @media (max-width: 720px) {
      .app {
        padding: 28px 22px;
      }
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app" data-blocked="{{BLOCKED}}">
    <header>
      <h1>Queue Mood Tracker</h1>
      <p class="subtitle">Track the emotional state of your support queue throughout the day.</p>
    </header>

    <form class="range" id="range-form" method="get" action="/">
      <label>Start Date
        <input type="date" id="start" name="start" value="{{START}}" max="{{TODAY}}" />
      </label>
      <label>End Date
        <input type="date" id="end" name="end" value="{{END}}" max="{{TODAY}}" />
      </label>
      <button class="secondary" type="submit">Apply</button>
    </form>

    <div class="status" id="status" data-type="{{STATUS_TYPE}}">{{STATUS}}</div>

    <section class="layout">
      <form class="card log" id="log-form" method="post" action="/mood">
        <h2>Log a Mood</h2>
        <div class="moods" role="radiogroup" aria-label="Select Mood">
          {{MOOD_OPTIONS}}
        </div>
        <label class="field">Add a note (optional)
          <input type="text" id="note" name="note" autocomplete="off" />
        </label>
        <input type="hidden" name="start" value="{{START}}" />
        <input type="hidden" name="end" value="{{END}}" />
        <button type="submit" id="submit-btn">Submit Mood</button>
      </form>

      <div class="card">
        <h2>Mood Distribution</h2>
        <p class="subtitle" id="chart-title"></p>
        <svg id="chart" viewBox="0 0 600 280" aria-label="Mood distribution chart" role="img"></svg>
        <p class="caption" id="last-update"></p>
      </div>
    </section>
  </main>

  <script>
    const appEl = document.querySelector('.app');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const chartTitleEl = document.getElementById('chart-title');
    const lastUpdateEl = document.getElementById('last-update');
    const startEl = document.getElementById('start');
    const endEl = document.getElementById('end');
    const noteEl = document.getElementById('note');
    const logForm = document.getElementById('log-form');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const renderMessage = (message) => {
      const label = document.createElementNS('http://www.w3.org/2000/svg', 'text');
      label.setAttribute('class', 'chart-label');
      label.setAttribute('x', '50%');
      label.setAttribute('y', '50%');
      label.setAttribute('text-anchor', 'middle');
      label.textContent = message;
      chartEl.replaceChildren(label);
    };

    const renderBarChart = (counts) => {
      const width = 600;
      const height = 280;
      const paddingX = 44;
      const paddingBottom = 48;
      const top = 20;

      const max = Math.max(1, ...counts.map((item) => item.count));
      const slot = (width - paddingX * 2) / counts.length;
      const barWidth = slot * 0.6;
      const scaleY = (height - top - paddingBottom) / max;
      const baseline = height - paddingBottom;

      const ticks = Math.min(max, 4);
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = Math.round((max * i) / ticks);
        const y = baseline - value * scaleY;
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${y}" x2="${width - paddingX}" y2="${y}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${y + 4}" text-anchor="end">${value}</text>`;
      }

      const bars = counts
        .map((item, index) => {
          const x = paddingX + index * slot + (slot - barWidth) / 2;
          const barHeight = item.count * scaleY;
          const center = x + barWidth / 2;
          return `
            <rect class="chart-bar" x="${x}" y="${baseline - barHeight}" width="${barWidth}" height="${barHeight}" rx="6">
              <title>${item.label}: ${item.count}</title>
            </rect>
            <text class="chart-label" x="${center}" y="${baseline - barHeight - 6}" text-anchor="middle">${item.count}</text>
            <text class="chart-symbol" x="${center}" y="${baseline + 30}" text-anchor="middle">${item.symbol}</text>`;
        })
        .join('');

      chartEl.innerHTML = `${grid}${bars}`;
    };

    const loadReport = async () => {
      const params = new URLSearchParams({ start: startEl.value, end: endEl.value });
      const res = await fetch(`/api/moods?${params}`);
      if (!res.ok) {
        renderMessage('No mood data available yet.');
        const msg = await res.text();
        throw new Error(msg || 'Unable to load mood data');
      }

      const report = await res.json();
      chartTitleEl.textContent = report.title;
      lastUpdateEl.textContent = report.last_update ? `Last updated: ${report.last_update}` : '';
      if (report.has_data) {
        renderBarChart(report.counts);
      } else {
        renderMessage(report.message);
      }
    };

    const submitMood = async () => {
      const mood = logForm.querySelector('input[name="mood"]:checked');
      setStatus('Saving...', 'info');
      const res = await fetch('/api/moods', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ mood: mood ? mood.value : '', note: noteEl.value })
      });

      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }

      await res.json();
      noteEl.value = '';
      setStatus('Mood logged successfully!', 'ok');
      await loadReport();
    };

    if (appEl.dataset.blocked === 'true') {
      renderMessage('Fix the date range to see the chart.');
      logForm.querySelector('button').disabled = true;
    } else {
      logForm.addEventListener('submit', (event) => {
        event.preventDefault();
        submitMood().catch((err) => setStatus(err.message, 'error'));
      });

      loadReport().catch((err) => setStatus(err.message, 'error'));
    }
  </script>
</body>
</html>
"#;
