pub fn build_main_ui_html() -> String {
    MAIN_UI_HTML.to_string()
}

const MAIN_UI_HTML: &str = r#"<!doctype html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Editor de Pirâmide Olfativa</title>
  <style>
    :root {
      --bg: #1f2024;
      --panel: #1b1c20;
      --line: #3f4248;
      --input-bg: #272a2f;
      --input-line: #4a4e55;
      --text: #f3f5f7;
      --muted: #9ca2ad;
      --btn-bg: #2a2d33;
      --btn-line: #5b616d;
      --ctrl-h: 28px;
      --font-sm: 12px;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      color: var(--text);
      background: var(--bg);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      font-size: 14px;
    }
    .wrap {
      max-width: 1060px;
      margin: 0 auto;
      padding: 10px;
    }
    .frame {
      border: 1px solid var(--line);
      background: var(--panel);
      padding: 10px 14px 14px;
    }
    h1 {
      font-size: 17px;
      margin: 0 0 10px;
    }
    h2 {
      font-size: 14px;
      margin: 14px 0 6px;
      color: #ffffff;
    }
    textarea {
      width: 100%;
      min-height: 150px;
      border: 1px solid var(--input-line);
      background: var(--input-bg);
      color: var(--text);
      border-radius: 4px;
      padding: 7px 8px;
      font: 12px/1.4 Consolas, monospace;
      resize: vertical;
      outline: none;
    }
    textarea:focus, input:focus {
      border-color: #6f8099;
    }
    input[type="text"] {
      width: 100%;
      height: var(--ctrl-h);
      border: 1px solid var(--input-line);
      background: var(--input-bg);
      padding: 0 6px;
      border-radius: 4px;
      color: var(--text);
      outline: none;
      font-size: var(--font-sm);
    }
    .btn {
      min-width: 84px;
      height: 28px;
      border: 1px solid var(--btn-line);
      background: var(--btn-bg);
      color: #ffffff;
      border-radius: 5px;
      font-weight: 500;
      padding: 0 10px;
      cursor: pointer;
      font-size: 12px;
    }
    .btn:hover {
      background: #343842;
    }
    .btn.small {
      min-width: 0;
      height: 24px;
      font-size: 11px;
    }
    .tier {
      border: 1px solid #2f3137;
      border-radius: 5px;
      padding: 6px 10px 10px;
      margin-bottom: 10px;
    }
    .note-row {
      display: grid;
      grid-template-columns: 44px minmax(160px, 1fr) minmax(220px, 2fr) 34px;
      gap: 6px;
      align-items: center;
      margin-bottom: 6px;
    }
    .note-thumb {
      width: 40px;
      height: 40px;
      object-fit: cover;
      border-radius: 4px;
      border: 1px solid var(--input-line);
      background: var(--input-bg);
    }
    .note-thumb.hidden {
      visibility: hidden;
    }
    .empty-tier {
      color: var(--muted);
      font-size: var(--font-sm);
      margin: 2px 0 6px;
    }
    .actions {
      margin-top: 8px;
      display: flex;
      gap: 6px;
      justify-content: space-between;
      align-items: center;
    }
    .right-actions {
      display: flex;
      gap: 6px;
      align-items: center;
    }
    .copy-wrap {
      position: relative;
      display: inline-flex;
      align-items: center;
      justify-content: center;
    }
    .copy-hover {
      position: absolute;
      right: 0;
      bottom: calc(100% + 6px);
      background: #2f7a54;
      border: 1px solid #4fa174;
      color: #ffffff;
      border-radius: 5px;
      padding: 3px 8px;
      font-size: 11px;
      line-height: 1;
      white-space: nowrap;
      opacity: 0;
      transform: translateY(4px);
      pointer-events: none;
      transition: opacity 140ms ease, transform 140ms ease;
    }
    .copy-hover.show {
      opacity: 1;
      transform: translateY(0);
    }
    .output-title {
      margin: 14px 0 4px;
      font-size: 12px;
      color: #ffffff;
    }
    .status {
      margin-top: 6px;
      min-height: 16px;
      color: var(--muted);
      font-size: 11px;
    }
    .hint {
      color: var(--muted);
      font-size: var(--font-sm);
      margin: 0 0 6px;
    }
    @media (max-width: 760px) {
      .note-row {
        grid-template-columns: 44px 1fr 34px;
      }
      .note-row input.url {
        grid-column: 2 / 4;
      }
    }
  </style>
</head>
<body>
  <main class="wrap">
    <section class="frame">
      <h1>Editor de Pirâmide Olfativa</h1>

      <section id="pasteStep">
        <p class="hint">Cole abaixo o HTML da descrição do produto (campo do CMS) e carregue para editar as notas.</p>
        <textarea id="sourceInput" spellcheck="false" placeholder="HTML da descrição do produto"></textarea>
        <div class="actions">
          <span></span>
          <div class="right-actions">
            <button id="loadBtn" class="btn">Carregar</button>
          </div>
        </div>
      </section>

      <section id="editStep" hidden>
        <div id="tiers"></div>

        <div class="actions">
          <button id="resetBtn" class="btn">Recomeçar</button>
          <div class="right-actions">
            <button id="generateBtn" class="btn">Gerar HTML</button>
          </div>
        </div>

        <div class="output-title">HTML gerado</div>
        <textarea id="output" spellcheck="false" readonly></textarea>
        <div class="actions">
          <span></span>
          <div class="right-actions">
            <div class="copy-wrap">
              <button id="copyBtn" class="btn">Copiar</button>
              <div id="copyHover" class="copy-hover" role="status" aria-live="polite">Copiado!</div>
            </div>
          </div>
        </div>
      </section>

      <div id="status" class="status"></div>
    </section>
  </main>

  <script>
    const state = {
      editing: false,
      tiers: [],
      output: "",
      confirm_remove: true,
    };
    let copyHoverTimer = null;

    function setStatus(message) {
      const status = document.getElementById("status");
      status.textContent = message || "";
    }

    function showCopyHover(message) {
      const hover = document.getElementById("copyHover");
      if (!hover) {
        return;
      }
      hover.textContent = message;
      hover.classList.add("show");
      if (copyHoverTimer) {
        clearTimeout(copyHoverTimer);
      }
      copyHoverTimer = setTimeout(() => {
        hover.classList.remove("show");
        copyHoverTimer = null;
      }, 1200);
    }

    async function apiGet(path) {
      const res = await fetch(path, { method: "GET" });
      const data = await res.json();
      if (!res.ok || !data.ok) {
        throw new Error(data.error || "request failed");
      }
      return data;
    }

    async function apiPost(path, body) {
      const res = await fetch(path, {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(body || {}),
      });
      const data = await res.json();
      if (!res.ok || !data.ok) {
        throw new Error(data.error || "request failed");
      }
      return data;
    }

    function applySnapshot(payload) {
      state.editing = Boolean(payload.editing);
      state.tiers = payload.tiers || [];
      state.output = payload.output || "";
      if (typeof payload.confirm_remove === "boolean") {
        state.confirm_remove = payload.confirm_remove;
      }
      render();
    }

    function buildNoteRow(tier, index, note) {
      const row = document.createElement("div");
      row.className = "note-row";

      const thumb = document.createElement("img");
      thumb.className = "note-thumb";
      if (note.image_url) {
        thumb.src = note.image_url;
      } else {
        thumb.classList.add("hidden");
      }
      thumb.addEventListener("error", () => {
        thumb.classList.add("hidden");
      });

      const nameInput = document.createElement("input");
      nameInput.type = "text";
      nameInput.placeholder = "Nome da nota";
      nameInput.value = note.name || "";

      const urlInput = document.createElement("input");
      urlInput.type = "text";
      urlInput.className = "url";
      urlInput.placeholder = "URL da imagem";
      urlInput.value = note.image_url || "";

      const removeBtn = document.createElement("button");
      removeBtn.className = "btn small";
      removeBtn.textContent = "✕";
      removeBtn.title = "Remover nota";

      nameInput.addEventListener("change", async () => {
        try {
          const data = await apiPost("/app/edit-note", {
            tier,
            index,
            field: "name",
            value: nameInput.value,
          });
          applySnapshot(data);
          setStatus("");
        } catch (err) {
          setStatus(`Erro ao salvar: ${err.message}`);
        }
      });

      urlInput.addEventListener("change", async () => {
        try {
          const data = await apiPost("/app/edit-note", {
            tier,
            index,
            field: "image_url",
            value: urlInput.value,
          });
          applySnapshot(data);
          setStatus("");
        } catch (err) {
          setStatus(`Erro ao salvar: ${err.message}`);
        }
      });

      removeBtn.addEventListener("click", async () => {
        if (state.confirm_remove) {
          const name = note.name || "(sem nome)";
          const ok = confirm(`Remover a nota ${name}?`);
          if (!ok) {
            return;
          }
        }
        try {
          const data = await apiPost("/app/remove-note", { tier, index });
          applySnapshot(data);
          setStatus("");
        } catch (err) {
          setStatus(`Erro ao remover: ${err.message}`);
        }
      });

      row.appendChild(thumb);
      row.appendChild(nameInput);
      row.appendChild(urlInput);
      row.appendChild(removeBtn);
      return row;
    }

    function render() {
      document.getElementById("pasteStep").hidden = state.editing;
      document.getElementById("editStep").hidden = !state.editing;

      const tiersRoot = document.getElementById("tiers");
      tiersRoot.innerHTML = "";

      for (const tierSnapshot of state.tiers) {
        const block = document.createElement("section");
        block.className = "tier";

        const title = document.createElement("h2");
        title.textContent = tierSnapshot.label;
        block.appendChild(title);

        if (!tierSnapshot.notes.length) {
          const empty = document.createElement("p");
          empty.className = "empty-tier";
          empty.textContent = "Nenhuma nota nesta camada.";
          block.appendChild(empty);
        }

        tierSnapshot.notes.forEach((note, index) => {
          block.appendChild(buildNoteRow(tierSnapshot.tier, index, note));
        });

        const addBtn = document.createElement("button");
        addBtn.className = "btn small";
        addBtn.textContent = "+ Adicionar nota";
        addBtn.addEventListener("click", async () => {
          try {
            const data = await apiPost("/app/add-note", { tier: tierSnapshot.tier });
            applySnapshot(data);
            setStatus("");
          } catch (err) {
            setStatus(`Erro ao adicionar: ${err.message}`);
          }
        });
        block.appendChild(addBtn);

        tiersRoot.appendChild(block);
      }

      document.getElementById("output").value = state.output;
    }

    document.getElementById("loadBtn").addEventListener("click", async () => {
      const html = document.getElementById("sourceInput").value;
      try {
        const data = await apiPost("/app/load", { html });
        applySnapshot(data);
        setStatus("");
      } catch (err) {
        setStatus(err.message);
      }
    });

    document.getElementById("resetBtn").addEventListener("click", async () => {
      const ok = confirm("Descartar a edição atual e voltar à colagem?");
      if (!ok) {
        return;
      }
      try {
        const data = await apiPost("/app/reset", {});
        applySnapshot(data);
        document.getElementById("sourceInput").value = "";
        setStatus("");
      } catch (err) {
        setStatus(`Erro ao recomeçar: ${err.message}`);
      }
    });

    document.getElementById("generateBtn").addEventListener("click", async () => {
      try {
        const data = await apiPost("/app/generate", {});
        applySnapshot(data);
        setStatus("HTML regenerado. Confira o campo abaixo.");
      } catch (err) {
        setStatus(`Erro ao gerar: ${err.message}`);
      }
    });

    document.getElementById("copyBtn").addEventListener("click", async () => {
      const text = state.output || "";
      if (!text.trim()) {
        setStatus("Gere o HTML antes de copiar.");
        return;
      }
      if (navigator.clipboard && navigator.clipboard.writeText) {
        navigator.clipboard.writeText(text).catch(() => {});
      }
      try {
        const data = await apiPost("/app/copy", { text });
        if (data.skipped) {
          setStatus("Cópia repetida ignorada.");
        } else {
          setStatus("Copiado.");
          showCopyHover("Copiado!");
        }
      } catch (err) {
        setStatus(`Erro ao copiar: ${err.message}`);
      }
    });

    async function init() {
      try {
        const data = await apiGet("/app/init");
        applySnapshot(data);
      } catch (err) {
        setStatus(`Erro ao iniciar: ${err.message}`);
      }
    }

    init();
  </script>
</body>
</html>
"#;
