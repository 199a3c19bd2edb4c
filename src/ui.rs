use crate::selection::MAX_FILES;

pub fn render_login(current: Option<&str>, error: Option<&str>) -> String {
    let notice = match (error, current) {
        (Some(error), _) => format!(r#"<div class="status" data-type="error">{}</div>"#, escape_html(error)),
        (None, Some(user)) => format!(
            r#"<div class="status">Signed in as {}. <a href="/upload">Continue</a></div>"#,
            escape_html(user)
        ),
        (None, None) => String::new(),
    };
    page("Login", &LOGIN_BODY.replace("{{NOTICE}}", &notice))
}

pub fn render_upload(user: &str) -> String {
    let body = UPLOAD_BODY
        .replace("{{USER}}", &escape_html(user))
        .replace("{{MAX}}", &MAX_FILES.to_string());
    page("Upload documents", &body)
}

pub fn render_dashboard() -> String {
    page("Financial Intelligence Dashboard", DASHBOARD_BODY)
}

fn page(title: &str, body: &str) -> String {
    LAYOUT
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{STYLE}}", STYLE)
        .replace("{{BODY}}", body)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · FinSight.AI</title>
  <style>{{STYLE}}</style>
</head>
<body>
{{BODY}}
</body>
</html>
"#;

const STYLE: &str = r#"
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
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
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
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

    .app.narrow {
      width: min(440px, 100%);
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    form {
      display: grid;
      gap: 14px;
    }

    input[type="email"],
    input[type="password"] {
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 14px;
      padding: 14px 16px;
      font: inherit;
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
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    button.secondary {
      background: var(--accent-2);
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
    }

    button.ghost {
      background: transparent;
      color: var(--accent-2);
      box-shadow: none;
      padding: 6px 10px;
    }

    button:disabled {
      opacity: 0.5;
      cursor: not-allowed;
    }

    .dropzone {
      border: 2px dashed rgba(47, 72, 88, 0.3);
      border-radius: 22px;
      padding: 36px;
      text-align: center;
      background: white;
      cursor: pointer;
    }

    .dropzone.active {
      border-color: var(--accent);
      background: #fff4ef;
    }

    .files {
      display: grid;
      gap: 8px;
    }

    .file {
      display: flex;
      justify-content: space-between;
      align-items: center;
      background: white;
      border-radius: 14px;
      padding: 10px 14px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .file small {
      color: #8b857d;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat,
    .card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      display: block;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      display: block;
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .summary-text {
      white-space: pre-wrap;
      line-height: 1.5;
      margin: 0;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 16px;
    }

    svg.chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-bar {
      fill: var(--accent-2);
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .category {
      display: flex;
      justify-content: space-between;
      padding: 6px 0;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    .swatch {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 4px;
      margin-right: 8px;
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

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    .results {
      display: grid;
      gap: 16px;
    }

    .hidden {
      display: none;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      button {
        width: 100%;
      }
    }
"#;

const LOGIN_BODY: &str = r#"  <main class="app narrow">
    <header>
      <div>
        <h1>FinSight.AI</h1>
        <p class="subtitle">Log in to analyze your financial documents in seconds.</p>
      </div>
    </header>
    {{NOTICE}}
    <form method="post" action="/login">
      <input type="email" name="email" placeholder="Email address" required />
      <input type="password" name="password" placeholder="Password" required />
      <button type="submit">Sign In</button>
    </form>
  </main>
"#;

const UPLOAD_BODY: &str = r#"  <main class="app">
    <header>
      <div>
        <h1>Upload documents</h1>
        <p class="subtitle">Invoices, receipts, bills (max {{MAX}} files)</p>
      </div>
      <form method="post" action="/logout">
        <button class="ghost" type="submit">{{USER}} · Sign out</button>
      </form>
    </header>

    <div class="dropzone" id="dropzone">
      <p>Drag &amp; drop files here</p>
      <p class="hint">or</p>
      <button class="secondary" type="button" id="browse">Browse files</button>
      <input id="picker" type="file" multiple class="hidden"
        accept=".pdf,.png,.jpg,.jpeg,.xlsx,.xls,.docx,.doc" />
    </div>

    <section id="selection" class="hidden">
      <header>
        <h2 id="selection-title">Selected Files</h2>
        <button class="ghost" type="button" id="clear">Clear all</button>
      </header>
      <div class="files" id="files"></div>
    </section>

    <button type="button" id="upload" disabled>Upload 0 files</button>
    <div class="status" id="status"></div>
    <p class="hint">Supported formats: PDF, JPG, PNG, Excel, Word. <a href="/dashboard">Open dashboard</a></p>
  </main>

  <script>
    const dropzone = document.getElementById('dropzone');
    const picker = document.getElementById('picker');
    const browse = document.getElementById('browse');
    const selectionEl = document.getElementById('selection');
    const selectionTitle = document.getElementById('selection-title');
    const filesEl = document.getElementById('files');
    const clearBtn = document.getElementById('clear');
    const uploadBtn = document.getElementById('upload');
    const statusEl = document.getElementById('status');

    let selection = { files: [], count: 0, max: {{MAX}}, uploading: false };

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const render = () => {
      const busy = selection.uploading;
      selectionEl.classList.toggle('hidden', selection.count === 0);
      selectionTitle.textContent = `Selected Files (${selection.count}/${selection.max})`;
      filesEl.replaceChildren(...selection.files.map((file, index) => {
        const row = document.createElement('div');
        row.className = 'file';
        const info = document.createElement('span');
        info.textContent = file.name + ' ';
        const size = document.createElement('small');
        size.textContent = `${(file.size / 1024).toFixed(2)} KB`;
        info.appendChild(size);
        const remove = document.createElement('button');
        remove.className = 'ghost';
        remove.type = 'button';
        remove.textContent = 'Remove';
        remove.disabled = busy;
        remove.addEventListener('click', () => call(`/api/files/${index}`, { method: 'DELETE' }));
        row.append(info, remove);
        return row;
      }));
      clearBtn.disabled = busy;
      browse.disabled = busy;
      picker.disabled = busy;
      uploadBtn.disabled = busy || selection.count === 0;
      uploadBtn.textContent = busy
        ? 'Processing...'
        : `Upload ${selection.count} ${selection.count === 1 ? 'file' : 'files'}`;
    };

    const call = async (url, options) => {
      const res = await fetch(url, options);
      if (!res.ok) {
        const msg = await res.text();
        alert(msg || 'Request failed');
        return;
      }
      selection = await res.json();
      render();
    };

    const addFiles = (list) => {
      if (!list || list.length === 0) {
        return;
      }
      if (selection.count + list.length > selection.max) {
        alert(`Maximum ${selection.max} files allowed`);
        return;
      }
      const form = new FormData();
      Array.from(list).forEach((file) => form.append('files', file));
      call('/api/files', { method: 'POST', body: form }).catch((err) => setStatus(err.message, 'error'));
    };

    const submit = async () => {
      selection.uploading = true;
      render();
      setStatus('', '');
      try {
        const res = await fetch('/api/submit', { method: 'POST' });
        if (res.status === 400 || res.status === 409) {
          alert(await res.text());
          return;
        }
        const outcome = await res.json();
        setStatus(outcome.message, outcome.status === 'success' ? 'ok' : 'error');
        if (outcome.redirect) {
          setTimeout(() => { window.location.href = outcome.redirect; }, outcome.redirect_after_ms || 0);
        }
      } catch (err) {
        setStatus('❌ Upload failed. Please try again.', 'error');
      } finally {
        await call('/api/files', { method: 'GET' });
      }
    };

    ['dragenter', 'dragover'].forEach((type) => dropzone.addEventListener(type, (event) => {
      event.preventDefault();
      dropzone.classList.add('active');
    }));
    dropzone.addEventListener('dragleave', (event) => {
      event.preventDefault();
      dropzone.classList.remove('active');
    });
    dropzone.addEventListener('drop', (event) => {
      event.preventDefault();
      dropzone.classList.remove('active');
      if (!selection.uploading) {
        addFiles(event.dataTransfer.files);
      }
    });
    dropzone.addEventListener('click', () => picker.click());
    browse.addEventListener('click', (event) => {
      event.stopPropagation();
      picker.click();
    });
    picker.addEventListener('change', () => {
      addFiles(picker.files);
      picker.value = '';
    });
    clearBtn.addEventListener('click', () => call('/api/files', { method: 'DELETE' }));
    uploadBtn.addEventListener('click', () => submit());

    call('/api/files', { method: 'GET' }).catch((err) => setStatus(err.message, 'error'));
  </script>
"#;

const DASHBOARD_BODY: &str = r#"  <main class="app">
    <header>
      <div>
        <h1>Financial Intelligence Dashboard</h1>
        <p class="subtitle">AI-powered insights from your documents</p>
      </div>
      <button type="button" id="generate">Generate AI Summary</button>
    </header>

    <div class="status" id="status"></div>

    <section id="empty" class="card hidden">
      <h2>No Data Yet</h2>
      <p class="hint">Click "Generate AI Summary" to analyze your uploaded documents. <a href="/upload">Upload more</a></p>
    </section>

    <section id="results" class="results hidden">
      <div class="panel">
        <div class="stat"><span class="label">Total Documents</span><span class="value" id="total-documents">0</span></div>
        <div class="stat"><span class="label">Total Spending</span><span class="value" id="total-spending">$0</span></div>
        <div class="stat"><span class="label">Total Tax</span><span class="value" id="total-tax">$0</span></div>
        <div class="stat"><span class="label">Unique Vendors</span><span class="value" id="unique-vendors">0</span></div>
      </div>

      <div class="card">
        <h2>Executive Summary</h2>
        <p class="summary-text" id="summary-text"></p>
      </div>

      <div class="charts">
        <div class="card hidden" id="vendor-card">
          <h2>Vendor-wise Spending</h2>
          <svg class="chart" id="vendor-chart" role="img" aria-label="Vendor totals"></svg>
        </div>
        <div class="card hidden" id="trend-card">
          <h2>Spending Trend Over Time</h2>
          <svg class="chart" id="trend-chart" role="img" aria-label="Spending trend"></svg>
        </div>
        <div class="card hidden" id="category-card">
          <h2>Category Breakdown</h2>
          <div id="category-list"></div>
        </div>
      </div>
    </section>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const generateBtn = document.getElementById('generate');
    const emptyEl = document.getElementById('empty');
    const resultsEl = document.getElementById('results');
    const palette = ['#ff6b4a', '#2f4858', '#ec4899', '#fb923c', '#22c55e', '#3b82f6'];

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const esc = (text) => String(text).replace(/[&<>"']/g, (ch) => ({
      '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
    })[ch]);

    const money = (value) => typeof value === 'string' ? value : `$${Number(value || 0).toLocaleString()}`;
    const count = (value) => typeof value === 'string' ? value : Number(value || 0).toLocaleString();

    const axis = (points, width, height, paddingX, paddingY, top) => {
      const values = points.map((point) => point.value);
      let min = Math.min(0, ...values);
      let max = Math.max(0, ...values);
      if (min === max) {
        min -= 1;
        max += 1;
      }
      const range = max - min;
      const scaleY = (height - top - paddingY) / range;
      const y = (value) => height - paddingY - (value - min) * scaleY;
      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = min + (range * i) / 4;
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${y(value)}" x2="${width - 10}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${paddingX - 8}" y="${y(value) + 4}" text-anchor="end">${Math.round(value).toLocaleString()}</text>`;
      }
      return { y, grid };
    };

    const renderBars = (el, points) => {
      const width = 600, height = 260, paddingX = 56, paddingY = 34, top = 20;
      const { y, grid } = axis(points, width, height, paddingX, paddingY, top);
      const slot = (width - paddingX - 10) / points.length;
      const bars = points.map((point, index) => {
        const x = paddingX + index * slot + slot * 0.15;
        const h = Math.abs(y(0) - y(point.value));
        const yTop = Math.min(y(0), y(point.value));
        return `<rect class="chart-bar" x="${x}" y="${yTop}" width="${slot * 0.7}" height="${h}" rx="6"><title>${esc(point.label)}: ${money(point.value)}</title></rect>`
          + `<text class="chart-label" x="${x + slot * 0.35}" y="${height - paddingY + 18}" text-anchor="middle">${esc(point.label)}</text>`;
      }).join('');
      el.setAttribute('viewBox', `0 0 ${width} ${height}`);
      el.innerHTML = grid + bars;
    };

    const renderLine = (el, points) => {
      const width = 600, height = 260, paddingX = 56, paddingY = 34, top = 20;
      const { y, grid } = axis(points, width, height, paddingX, paddingY, top);
      const xStep = points.length > 1 ? (width - paddingX - 20) / (points.length - 1) : 0;
      const x = (index) => paddingX + index * xStep;
      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');
      const labelEvery = points.length > 8 ? 2 : 1;
      const labels = points
        .map((point, index) => index % labelEvery === 0
          ? `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${esc(point.label)}</text>`
          : '')
        .join('');
      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.value)}" r="4"><title>${esc(point.label)}: ${money(point.value)}</title></circle>`)
        .join('');
      el.setAttribute('viewBox', `0 0 ${width} ${height}`);
      el.innerHTML = `${grid}<path class="chart-line" d="${path}" />${circles}${labels}`;
    };

    const renderCategories = (el, points) => {
      el.innerHTML = points.map((point, index) => `
        <div class="category">
          <span><span class="swatch" style="background:${palette[index % palette.length]}"></span>${esc(point.label)}</span>
          <span>${money(point.value)}</span>
        </div>`).join('');
    };

    const showSeries = (cardId, points, draw, target) => {
      const card = document.getElementById(cardId);
      const present = Array.isArray(points) && points.length > 0;
      card.classList.toggle('hidden', !present);
      if (present) {
        draw(document.getElementById(target), points);
      }
    };

    const render = (view) => {
      emptyEl.classList.toggle('hidden', view.has_result);
      resultsEl.classList.toggle('hidden', !view.has_result);
      if (!view.has_result) {
        return;
      }
      document.getElementById('total-documents').textContent = count(view.metrics.total_documents);
      document.getElementById('total-spending').textContent = money(view.metrics.total_spending);
      document.getElementById('total-tax').textContent = money(view.metrics.total_tax);
      document.getElementById('unique-vendors').textContent = count(view.metrics.unique_vendors);
      document.getElementById('summary-text').textContent = view.summary_text;
      showSeries('vendor-card', view.vendor_totals, renderBars, 'vendor-chart');
      showSeries('trend-card', view.date_trends, renderLine, 'trend-chart');
      showSeries('category-card', view.category_breakdown, renderCategories, 'category-list');
    };

    const load = async () => {
      const res = await fetch('/api/dashboard');
      if (!res.ok) {
        throw new Error('Unable to load dashboard');
      }
      render(await res.json());
    };

    const generate = async () => {
      generateBtn.disabled = true;
      generateBtn.textContent = 'Analyzing...';
      setStatus('', '');
      try {
        const res = await fetch('/api/summary', { method: 'POST' });
        if (!res.ok) {
          throw new Error(await res.text() || 'Failed to generate summary. Please try again.');
        }
        render(await res.json());
      } catch (err) {
        setStatus(err.message, 'error');
      } finally {
        generateBtn.disabled = false;
        generateBtn.textContent = 'Generate AI Summary';
      }
    };

    generateBtn.addEventListener('click', () => generate());
    load().catch((err) => setStatus(err.message, 'error'));
  </script>
"#;
