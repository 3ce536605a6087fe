use crate::Result;
use crate::view::GraphView;

/// Serialize `data` for embedding inside a `<script>` block.
pub(crate) fn embed_json<T: serde::Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string(data)?.replace("</", "<\\/"))
}

/// Render a self-contained HTML page for one graph view (data embedded as JSON).
///
/// The template is not passed through `format!()` because the inline script
/// uses `${x}` template literals.
pub fn render_graph_html(view: &GraphView) -> Result<String> {
    let json = embed_json(view)?;

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Migration plan</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  h1 { font-size: 18px; margin: 0 0 8px 0; }
  .container { display: flex; height: calc(100vh - 84px); }
  .sidebar { width: 320px; border-right: 1px solid #ddd; padding: 12px; overflow: auto; }
  .main { flex: 1; overflow: auto; position: relative; }

  .summary { display: flex; gap: 12px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 4px; vertical-align: middle; }

  #canvas { position: relative; }
  #edges { position: absolute; left: 0; top: 0; pointer-events: none; }
  .node { position: absolute; width: 180px; padding: 4px 6px; border-radius: 6px; font-size: 12px;
          border: 2px solid #999; background: white; cursor: pointer; overflow: hidden;
          white-space: nowrap; text-overflow: ellipsis; box-shadow: 1px 1px 3px rgba(0,0,0,0.2); }
  .node.source { border-radius: 12px / 6px; }
  .node.product { clip-path: polygon(6% 0, 94% 0, 100% 50%, 94% 100%, 6% 100%, 0 50%); }
  .node.dim { opacity: 0.25; }
  .node.selected { outline: 3px solid #cfe3ff; }
  .muted { color: #777; font-size: 12px; }
  .item { padding: 2px 4px; cursor: pointer; border-radius: 4px; font-size: 13px; }
  .item:hover { background: #f3f3f3; }
  pre { white-space: pre-wrap; font-size: 13px; background: #fafafa; padding: 8px; border: 1px solid #eee; }
</style>
</head>
<body>
<header>
  <h1 id="title"></h1>
  <div class="summary" id="summary"></div>
</header>

<div class="container">
  <div class="sidebar">
    <input id="search" placeholder="Search node..." style="width: 100%; box-sizing: border-box; padding: 6px 8px; border: 1px solid #ddd; border-radius: 6px;">
    <pre id="details">Select a node</pre>
    <div id="list"></div>
  </div>
  <div class="main">
    <div id="canvas">
      <svg id="edges"></svg>
    </div>
  </div>
</div>

<script>
// Embedded graph view (JSON object literal)
const DATA = __DATA__;

const COL_X = [24, 304, 584];
const ROW_H = 34;
const NODE_W = 180;

const state = { selected: null, search: "" };

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function layout() {
  const rows = [0, 0, 0];
  const pos = new Map();
  for (const n of DATA.nodes) {
    pos.set(n.key, { x: COL_X[n.column], y: 16 + rows[n.column] * ROW_H });
    rows[n.column] += 1;
  }
  return { pos, height: 32 + Math.max(...rows, 1) * ROW_H };
}

function neighbours(key) {
  const out = new Set([key]);
  for (const e of DATA.edges) {
    if (e.from === key) out.add(e.to);
    if (e.to === key) out.add(e.from);
  }
  return out;
}

function renderSummary() {
  document.getElementById("title").textContent = DATA.title;
  const counts = {};
  for (const n of DATA.nodes) {
    if (n.kind !== "task") continue;
    counts[n.status] = (counts[n.status] || 0) + 1;
  }
  const kinds = { source: 0, task: 0, product: 0 };
  for (const n of DATA.nodes) kinds[n.kind] += 1;
  const colors = {};
  for (const n of DATA.nodes) if (!n.ready) colors[n.status] = n.status_color;
  let html = `
    <span class="pill">sources: <b>${kinds.source}</b></span>
    <span class="pill">tasks: <b>${kinds.task}</b></span>
    <span class="pill">products: <b>${kinds.product}</b></span>`;
  for (const [status, n] of Object.entries(counts)) {
    html += `<span class="pill"><span class="dot" style="background:${colors[status] || "#ccc"}"></span>${escapeHtml(status)}: <b>${n}</b></span>`;
  }
  const ready = DATA.nodes.filter(n => n.ready).length;
  if (ready) html += `<span class="pill"><span class="dot" style="background:violet"></span>ready: <b>${ready}</b></span>`;
  document.getElementById("summary").innerHTML = html;
}

function renderGraph() {
  const canvas = document.getElementById("canvas");
  for (const el of canvas.querySelectorAll(".node")) el.remove();

  const { pos, height } = layout();
  canvas.style.height = height + "px";
  canvas.style.width = (COL_X[2] + NODE_W + 40) + "px";

  const focus = state.selected ? neighbours(state.selected) : null;
  const s = state.search.toLowerCase();

  const svg = document.getElementById("edges");
  svg.setAttribute("width", COL_X[2] + NODE_W + 40);
  svg.setAttribute("height", height);
  let lines = "";
  for (const e of DATA.edges) {
    const a = pos.get(e.from), b = pos.get(e.to);
    if (!a || !b) continue;
    const dim = focus && !(focus.has(e.from) && focus.has(e.to));
    const dash = e.kind === "task_dependency" ? ' stroke-dasharray="4 3"' : "";
    const x1 = a.x + (a.x < b.x ? NODE_W : NODE_W / 2), y1 = a.y + 12;
    const x2 = b.x + (a.x < b.x ? 0 : NODE_W / 2), y2 = b.y + 12;
    lines += `<line x1="${x1}" y1="${y1}" x2="${x2}" y2="${y2}" stroke="#888" stroke-opacity="${dim ? 0.1 : 0.7}"${dash}/>`;
  }
  svg.innerHTML = lines;

  for (const n of DATA.nodes) {
    const p = pos.get(n.key);
    const el = document.createElement("div");
    el.className = "node " + n.kind
      + (state.selected === n.key ? " selected" : "")
      + ((focus && !focus.has(n.key)) || (s && !n.label.toLowerCase().includes(s) && !n.id.toLowerCase().includes(s)) ? " dim" : "");
    el.style.left = p.x + "px";
    el.style.top = p.y + "px";
    el.style.background = n.color;
    el.style.borderColor = n.status_color;
    el.title = n.tooltip;
    el.innerHTML = `<span class="dot" style="background:${n.status_color}"></span>${escapeHtml(n.label)}`;
    el.onclick = () => select(n.key);
    canvas.appendChild(el);
  }
}

function renderList() {
  const list = document.getElementById("list");
  list.innerHTML = "";
  const s = state.search.toLowerCase();
  for (const n of DATA.nodes) {
    if (s && !n.label.toLowerCase().includes(s) && !n.id.toLowerCase().includes(s)) continue;
    const row = document.createElement("div");
    row.className = "item";
    row.innerHTML = `<span class="dot" style="background:${n.status_color}"></span>${escapeHtml(n.label)} <span class="muted">${n.kind}</span>`;
    row.onclick = () => select(n.key);
    list.appendChild(row);
  }
}

function select(key) {
  state.selected = state.selected === key ? null : key;
  const n = DATA.nodes.find(x => x.key === state.selected);
  document.getElementById("details").textContent = n
    ? n.tooltip + (n.ready ? "\nReady to start" : "")
    : "Select a node";
  renderGraph();
}

document.getElementById("search").addEventListener("input", (e) => {
  state.search = e.target.value || "";
  renderList();
  renderGraph();
});

renderSummary();
renderList();
renderGraph();
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
