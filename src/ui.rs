use crate::dashboard::date_label;
use crate::flash::Flash;
use crate::models::{AnnotatedEntry, Dashboard, GoalStatus};
use std::fmt::Write;

pub fn render_index(dashboard: &Dashboard, flash: Option<&Flash>) -> String {
    let goal = dashboard
        .calorie_goal
        .map(|goal| format!("{goal} kcal"))
        .unwrap_or_else(|| "Not set".to_string());
    let goal_value = dashboard
        .calorie_goal
        .map(|goal| goal.to_string())
        .unwrap_or_default();

    let chart_data = serde_json::json!({
        "chart": &dashboard.chart,
        "goal": dashboard.calorie_goal,
    })
    .to_string()
    .replace("</", "<\\/");

    INDEX_HTML
        .replace("{{GOAL}}", &goal)
        .replace("{{GOAL_VALUE}}", &goal_value)
        .replace("{{ROWS}}", &render_rows(dashboard))
        .replace("{{CHART_DATA}}", &chart_data)
        .replace("{{FLASH}}", &render_flash(flash))
}

fn render_flash(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => format!(
            r#"<div class="flash" data-type="{}">{}</div>"#,
            flash.kind.as_str(),
            escape_html(&flash.message)
        ),
        None => String::new(),
    }
}

fn render_rows(dashboard: &Dashboard) -> String {
    if dashboard.entries.is_empty() {
        return r#"<tr><td colspan="5" class="empty">No entries yet.</td></tr>"#.to_string();
    }

    let mut rows = String::new();
    for AnnotatedEntry { entry, status } in &dashboard.entries {
        let label = date_label(entry.date);
        let over = dashboard.over_goal_flags.get(&label).copied().unwrap_or(false);
        let _ = write!(
            rows,
            r#"<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class="{}">{}</td></tr>"#,
            if over { r#" class="over-day""# } else { "" },
            label,
            optional(entry.weight),
            optional(entry.calories),
            optional(entry.steps),
            status_class(*status),
            status
        );
    }
    rows
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_else(|| "-".to_string())
}

fn status_class(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::WithinGoal => "status-within",
        GoalStatus::OverGoal => "status-over",
        GoalStatus::NotApplicable => "status-na",
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Fitness Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef4ea;
      --bg-2: #c9e4c5;
      --ink: #24302a;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --accent-3: #3f8f6b;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3f1dc 60%, #f4f8f1 100%);
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
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .flash {
      border-radius: 14px;
      padding: 12px 16px;
      font-weight: 500;
    }

    .flash[data-type="error"] {
      background: rgba(198, 59, 43, 0.12);
      color: #c63b2b;
    }

    .flash[data-type="success"] {
      background: rgba(45, 122, 75, 0.12);
      color: #2d7a4b;
    }

    .forms {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
      gap: 16px;
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    form {
      display: grid;
      gap: 10px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    input {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    .goal-value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
      margin: 0 0 10px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.95rem;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    tr.over-day {
      background: rgba(255, 107, 74, 0.08);
    }

    .status-over {
      color: #c63b2b;
      font-weight: 600;
    }

    .status-within {
      color: #2d7a4b;
      font-weight: 600;
    }

    .status-na,
    .empty {
      color: #8b857d;
    }

    .charts {
      display: grid;
      gap: 16px;
    }

    .chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke-width: 3;
    }

    .series-weight { stroke: var(--accent-2); }
    .series-calories { stroke: var(--accent); }
    .series-steps { stroke: var(--accent-3); }

    .chart-point {
      fill: white;
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-goal {
      stroke: #c63b2b;
      stroke-width: 2;
      stroke-dasharray: 6 6;
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .legend {
      display: flex;
      gap: 16px;
      font-size: 0.85rem;
      color: #6b645d;
    }

    .legend span::before {
      content: '';
      display: inline-block;
      width: 14px;
      height: 3px;
      margin-right: 6px;
      vertical-align: middle;
      background: currentColor;
    }

    .legend .calories { color: var(--accent); }
    .legend .steps { color: var(--accent-3); }
    .legend .goal { color: #c63b2b; }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      button {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Fitness Tracker</h1>
      <p class="subtitle">Log weight, calories and steps each day and keep an eye on your calorie goal.</p>
    </header>

    {{FLASH}}

    <section class="forms">
      <div class="card">
        <h2>Daily calorie goal</h2>
        <p class="goal-value" id="goal">{{GOAL}}</p>
        <form method="post" action="/set_goal">
          <label>Goal (kcal)
            <input type="number" name="calorie_goal" step="1" value="{{GOAL_VALUE}}" required />
          </label>
          <button type="submit">Save goal</button>
        </form>
      </div>
      <div class="card">
        <h2>Add entry</h2>
        <form method="post" action="/add">
          <label>Date
            <input type="date" name="date" required />
          </label>
          <label>Weight
            <input type="number" name="weight" step="0.01" />
          </label>
          <label>Calories
            <input type="number" name="calories" step="1" />
          </label>
          <label>Steps
            <input type="number" name="steps" step="1" />
          </label>
          <button type="submit">Add entry</button>
        </form>
      </div>
    </section>

    <section class="card">
      <h2>Recent entries</h2>
      <table>
        <thead>
          <tr><th>Date</th><th>Weight</th><th>Calories</th><th>Steps</th><th>Status</th></tr>
        </thead>
        <tbody>
          {{ROWS}}
        </tbody>
      </table>
    </section>

    <section class="charts">
      <div class="card">
        <h2>Weight over time</h2>
        <svg id="weight-chart" class="chart" viewBox="0 0 600 260" aria-label="Weight chart" role="img"></svg>
      </div>
      <div class="card">
        <h2>Calories and steps</h2>
        <div class="legend">
          <span class="calories">Calories</span>
          <span class="steps">Steps</span>
          <span class="goal">Calorie goal</span>
        </div>
        <svg id="activity-chart" class="chart" viewBox="0 0 600 260" aria-label="Calories and steps chart" role="img"></svg>
      </div>
    </section>
  </main>

  <script id="chart-data" type="application/json">{{CHART_DATA}}</script>
  <script>
    const data = JSON.parse(document.getElementById('chart-data').textContent);
    const chart = data.chart;

    const formatAxisValue = (value) => {
      const rounded = Math.round(value * 10) / 10;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(1);
    };

    // Series values may be null; the line breaks at each gap.
    const renderLineChart = (chartEl, labels, series, goal) => {
      const values = series
        .flatMap((item) => item.values)
        .filter((value) => value !== null);
      if (goal !== null && goal !== undefined) {
        values.push(goal);
      }
      if (!labels.length || !values.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 52;
      const paddingY = 34;
      const top = 24;

      let min = Math.min(...values);
      let max = Math.max(...values);
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const range = max - min;
      const xStep = labels.length > 1 ? (width - paddingX * 2) / (labels.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }

      const lines = series
        .map((item) => {
          let path = '';
          let penDown = false;
          let circles = '';
          item.values.forEach((value, index) => {
            if (value === null) {
              penDown = false;
              return;
            }
            path += `${penDown ? 'L' : 'M'} ${x(index).toFixed(2)} ${y(value).toFixed(2)} `;
            penDown = true;
            circles += `<circle class="chart-point ${item.className}" cx="${x(index)}" cy="${y(value)}" r="4" />`;
          });
          return `<path class="chart-line ${item.className}" d="${path}" />${circles}`;
        })
        .join('');

      const goalLine = goal !== null && goal !== undefined
        ? `<line class="chart-goal" x1="${paddingX}" y1="${y(goal)}" x2="${width - paddingX}" y2="${y(goal)}" />`
        : '';

      const labelEvery = labels.length > 10 ? Math.ceil(labels.length / 10) : 1;
      const xLabels = labels
        .map((label, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${label.slice(5)}</text>`;
        })
        .join('');

      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);
      chartEl.innerHTML = `
        ${grid}
        ${goalLine}
        ${lines}
        ${xLabels}
      `;
    };

    renderLineChart(
      document.getElementById('weight-chart'),
      chart.labels,
      [{ values: chart.weights, className: 'series-weight' }],
      null
    );

    renderLineChart(
      document.getElementById('activity-chart'),
      chart.labels,
      [
        { values: chart.calories, className: 'series-calories' },
        { values: chart.steps, className: 'series-steps' }
      ],
      data.goal
    );
  </script>
</body>
</html>
"#;
