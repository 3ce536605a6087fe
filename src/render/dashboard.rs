use crate::Result;
use crate::render::html::embed_json;
use crate::view::DashboardData;

/// Render the dashboard snapshot: overall bar, per-product and per-source
/// stacked bars, and a status-filtered task table.
pub fn render_dashboard_html(data: &DashboardData) -> Result<String> {
    let json = embed_json(data)?;

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Migration Analytics</title>
<style>
  body { font-family: Arial, sans-serif; margin: 0; color: #222; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  h1 { font-size: 20px; margin: 0 0 8px 0; color: #008000; }
  h2 { font-size: 16px; margin: 16px 0 8px 0; }
  .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; padding: 0 16px; }
  .card { border: 1px solid #ddd; border-radius: 8px; padding: 12px; }
  .legend { display: flex; gap: 12px; flex-wrap: wrap; font-size: 13px; }
  .legend label { cursor: pointer; }
  .dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 4px; vertical-align: middle; }
  .bar { display: flex; height: 18px; border-radius: 4px; overflow: hidden; background: #f3f3f3; }
  .bar span { display: block; height: 100%; }
  .bar-row { display: grid; grid-template-columns: 160px 1fr 110px; gap: 8px; align-items: center; font-size: 13px; margin: 4px 0; }
  .name { overflow: hidden; white-space: nowrap; text-overflow: ellipsis; }
  .muted { color: #777; font-size: 12px; }
  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 13px; }
  th { position: sticky; top: 0; background: white; border-bottom: 1px solid #ddd; }
  .wide { grid-column: 1 / span 2; }
</style>
</head>
<body>
<header>
  <h1>Migration Analytics</h1>
  <div class="legend" id="legend"></div>
</header>

<div class="grid">
  <div class="card wide">
    <h2>All source and product related tasks</h2>
    <div id="overall"></div>
  </div>
  <div class="card">
    <h2>Products</h2>
    <div id="products"></div>
  </div>
  <div class="card">
    <h2>Sources</h2>
    <div id="sources"></div>
  </div>
  <div class="card wide">
    <h2>Tasks <span class="muted" id="shown"></span></h2>
    <table>
      <thead>
        <tr><th>task</th><th>source</th><th>product</th><th>category</th><th>status</th></tr>
      </thead>
      <tbody id="rows"></tbody>
    </table>
  </div>
</div>

<script>
// Embedded dashboard snapshot (JSON object literal)
const DATA = __DATA__;

const COLOR = {};
const LABEL = {};
for (const l of DATA.legend) { COLOR[l.status] = l.color; LABEL[l.status] = l.label; }

const state = { statuses: new Set(DATA.legend.map(l => l.status)) };
const ready = new Set(DATA.ready);

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function total(counts) {
  return Object.values(counts).reduce((a, b) => a + b, 0);
}

function bar(counts) {
  const t = total(counts);
  if (!t) return `<div class="bar"></div>`;
  let html = "";
  for (const l of DATA.legend) {
    const n = counts[l.status] || 0;
    if (!n) continue;
    html += `<span title="${escapeHtml(l.label)}: ${n}" style="width:${(100 * n / t).toFixed(2)}%;background:${l.color}"></span>`;
  }
  return `<div class="bar">${html}</div>`;
}

function barRow(name, counts, overall) {
  return `<div class="bar-row">
    <div class="name" title="${escapeHtml(name)}">${escapeHtml(name)}</div>
    ${bar(counts)}
    <div><span class="dot" style="background:${COLOR[overall]}"></span>${escapeHtml(LABEL[overall])}</div>
  </div>`;
}

function renderLegend() {
  const el = document.getElementById("legend");
  el.innerHTML = "";
  for (const l of DATA.legend) {
    const label = document.createElement("label");
    const checked = state.statuses.has(l.status) ? "checked" : "";
    label.innerHTML = `<input type="checkbox" ${checked}> <span class="dot" style="background:${l.color}"></span>${escapeHtml(l.label)} (${DATA.overall[l.status] || 0})`;
    label.querySelector("input").onchange = (e) => {
      if (e.target.checked) state.statuses.add(l.status);
      else state.statuses.delete(l.status);
      renderRows();
    };
    el.appendChild(label);
  }
}

function renderBars() {
  document.getElementById("overall").innerHTML = barRow("Total", DATA.overall, DATA.overall_status);
  document.getElementById("products").innerHTML = DATA.products
    .map(p => barRow(`${p.id} ${p.name}`, p.counts, p.overall)).join("");
  document.getElementById("sources").innerHTML = DATA.sources
    .map(s => barRow(s.name, s.counts, s.overall)).join("");
}

function renderRows() {
  const body = document.getElementById("rows");
  body.innerHTML = "";
  let shown = 0;
  for (const r of DATA.rows) {
    if (!state.statuses.has(r.status)) continue;
    shown += 1;
    const tr = document.createElement("tr");
    const tag = ready.has(r.task_id) ? ` <span class="muted">(ready)</span>` : "";
    tr.innerHTML = `
      <td>${escapeHtml(r.task_id)}${tag}</td>
      <td>${escapeHtml(r.source_name)}</td>
      <td>${escapeHtml(r.product_id)} ${escapeHtml(r.product_name)}</td>
      <td>${escapeHtml(r.category)}</td>
      <td><span class="dot" style="background:${COLOR[r.status]}"></span>${escapeHtml(LABEL[r.status])}</td>
    `;
    body.appendChild(tr);
  }
  document.getElementById("shown").textContent = `(${shown} of ${DATA.rows.length})`;
}

renderLegend();
renderBars();
renderRows();
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::small_graph;
    use crate::view::dashboard;

    #[test]
    fn embeds_snapshot() {
        let html = render_dashboard_html(&dashboard(&small_graph())).unwrap();
        assert!(!html.contains("__DATA__"));
        assert!(html.contains("\"overall_status\":\"unknown\""));
        assert!(html.contains("\"task_id\":\"T3\""));
    }
}
