//! Server-rendered HTML for the single page.
//!
//! The page moves through a small set of states: the visitor has not logged
//! in yet, is logged in and looking at the form, or has submitted it and gets
//! either the playlist link or an error back.

use crate::models::recommendation::{DEFAULT_SONG_COUNT, MAX_SONG_COUNT, MIN_SONG_COUNT};
use crate::models::{GeneratedPlaylist, RecommendedSong};

#[derive(Debug)]
pub enum ShellState<'a> {
    Unauthenticated {
        login_url: &'a str,
        denied_reason: Option<&'a str>,
    },
    AwaitingInput {
        code: &'a str,
        prompt: &'a str,
        song_count: u32,
        error: Option<String>,
    },
    Completed {
        code: &'a str,
        result: &'a GeneratedPlaylist,
    },
    Failed {
        message: String,
        requires_login: bool,
        /// Authorize link for the login prompt; the start page when unknown.
        login_url: Option<&'a str>,
    },
}

pub fn render(state: &ShellState<'_>) -> String {
    let body = match state {
        ShellState::Unauthenticated {
            login_url,
            denied_reason,
        } => {
            let notice = denied_reason
                .map(|reason| {
                    format!(
                        r#"<p class="error">Spotify login was not completed: {}</p>"#,
                        escape(reason)
                    )
                })
                .unwrap_or_default();
            format!(
                r#"{notice}<p>Please log in to <a target="_self" href="{url}">Spotify</a></p>"#,
                notice = notice,
                url = escape(login_url)
            )
        }
        ShellState::AwaitingInput {
            code,
            prompt,
            song_count,
            error,
        } => {
            let notice = error
                .as_deref()
                .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
                .unwrap_or_default();
            format!("{}{}", notice, form(code, prompt, *song_count))
        }
        ShellState::Completed { code, result } => completed(code, result),
        ShellState::Failed {
            message,
            requires_login,
            login_url,
        } => {
            let next = if *requires_login {
                format!(
                    r#"<p><a target="_self" href="{}">Log in again</a></p>"#,
                    escape(login_url.unwrap_or("/"))
                )
            } else {
                r#"<p><a href="/">Start over</a></p>"#.to_string()
            };
            format!(r#"<p class="error">{}</p>{}"#, escape(message), next)
        }
    };

    page(&body)
}

fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Playlist Generator</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<main>
<h1>Playlist Generator</h1>
{}
</main>
</body>
</html>
"#,
        body
    )
}

fn form(code: &str, prompt: &str, song_count: u32) -> String {
    let song_count = song_count.clamp(MIN_SONG_COUNT, MAX_SONG_COUNT);
    format!(
        r#"<form method="post" action="/?code={code}">
<label for="prompt">Describe the music you want to hear..</label>
<input type="text" id="prompt" name="prompt" value="{prompt}" required>
<label for="song_count">Songs: <output id="song_count_value">{count}</output></label>
<input type="range" id="song_count" name="song_count" min="{min}" max="{max}" value="{count}"
 oninput="document.getElementById('song_count_value').value = this.value">
<button type="submit">Create</button>
</form>"#,
        code = escape(&form_encode(code)),
        prompt = escape(prompt),
        count = song_count,
        min = MIN_SONG_COUNT,
        max = MAX_SONG_COUNT,
    )
}

fn completed(code: &str, result: &GeneratedPlaylist) -> String {
    let mut html = format!(
        r#"<p>Playlist created <a href="{url}">Click here to view the playlist</a></p>
<p>{name}: {added} tracks added.</p>"#,
        url = escape(&result.url),
        name = escape(&result.playlist.name),
        added = result.tracks.len(),
    );

    if !result.not_found.is_empty() {
        html.push_str(&format!(
            "<p>{} recommended songs were not found on Spotify:</p><ul>{}</ul>",
            result.not_found.len(),
            result.not_found.iter().map(song_item).collect::<String>()
        ));
    }

    html.push_str(&form(code, "", DEFAULT_SONG_COUNT));
    html
}

fn song_item(song: &RecommendedSong) -> String {
    format!(
        "<li>{} by {}</li>",
        escape(&song.title),
        escape(&song.artists.join(", "))
    )
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn form_encode(value: &str) -> String {
    reqwest::Url::parse_with_params("http://localhost/", &[("v", value)])
        .ok()
        .and_then(|url| url.query().map(|q| q.trim_start_matches("v=").to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page_has_only_login_link() {
        let html = render(&ShellState::Unauthenticated {
            login_url: "https://accounts.spotify.com/authorize?client_id=a&scope=b",
            denied_reason: None,
        });

        assert!(html.contains(r#"href="https://accounts.spotify.com/authorize?client_id=a&amp;scope=b""#));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_form_keeps_code_and_defaults() {
        let html = render(&ShellState::AwaitingInput {
            code: "AQ/x+y",
            prompt: "",
            song_count: DEFAULT_SONG_COUNT,
            error: None,
        });

        assert!(html.contains(r#"action="/?code=AQ%2Fx%2By""#));
        assert!(html.contains(r#"min="1" max="30" value="10""#));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = render(&ShellState::Failed {
            message: "<script>alert(1)</script>".to_string(),
            requires_login: false,
            login_url: None,
        });

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_login_prompt_links_to_authorize_url() {
        let html = render(&ShellState::Failed {
            message: "expired".to_string(),
            requires_login: true,
            login_url: Some("https://accounts.spotify.com/authorize?client_id=a"),
        });

        assert!(html.contains(
            r#"href="https://accounts.spotify.com/authorize?client_id=a">Log in again"#
        ));
    }
}
