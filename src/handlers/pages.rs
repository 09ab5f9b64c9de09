// src/handlers/pages.rs

use axum::response::Html;

// Página mínima de login: o frontend real vive fora deste serviço.
const LOGIN_HTML: &str = r#"<!doctype html>
<html lang="pt-BR">
<head><meta charset="utf-8"><title>Entrar</title></head>
<body>
  <form id="login">
    <input name="username" placeholder="Usuário" autocomplete="username" required>
    <input name="password" type="password" placeholder="Senha" autocomplete="current-password" required>
    <button type="submit">Entrar</button>
  </form>
  <script>
    document.getElementById('login').addEventListener('submit', async (ev) => {
      ev.preventDefault();
      const form = new FormData(ev.target);
      const res = await fetch('/api/auth/login', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ username: form.get('username'), password: form.get('password') }),
      });
      if (res.ok) { window.location.href = '/api/locations'; } else { alert('Usuário ou senha inválidos.'); }
    });
  </script>
</body>
</html>
"#;

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}
