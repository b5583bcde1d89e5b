use crate::model::{Resolution, SubtreeRemote};
use crate::util::format::{ahead_by_label, tags_label, underline};

const AHEAD_WIDTH: usize = 15;
const TAGS_WIDTH: usize = 30;
const COLUMN_GAP: usize = 3;
const NO_REMOTE: &str = "-";

pub fn up_to_date_line(remote: &SubtreeRemote) -> String {
    format!(
        "{} already up-to-date with {}.",
        remote.subtree.prefix(),
        remote.repository.html_url
    )
}

pub fn diverged_line(remote: &SubtreeRemote) -> String {
    format!(
        "{} is diverged from {}.",
        remote.subtree.prefix(),
        remote.repository.html_url
    )
}

/// The `diff` output: a one-liner for a single current subtree, else the table
pub fn render_diff(resolutions: &[Resolution], styled: bool) -> String {
    if let [only] = resolutions {
        if let Some(remote) = only.remote() {
            if !remote.is_ahead() && !remote.is_diverged() {
                return format!("{}\n", up_to_date_line(remote));
            }
        }
    }
    render_table(resolutions, styled)
}

/// One row per subtree in input order, then the failures with their causes
pub fn render_table(resolutions: &[Resolution], styled: bool) -> String {
    let remote_url = |r: &Resolution| r.remote().map(|m| m.repository.html_url.clone());

    let prefix_width = resolutions
        .iter()
        .map(|r| r.subtree.prefix().len())
        .chain(["Prefix".len()])
        .max()
        .unwrap_or(0)
        + COLUMN_GAP;
    let remote_width = resolutions
        .iter()
        .map(|r| remote_url(r).map_or(NO_REMOTE.len(), |u| u.len()))
        .chain(["Remote".len()])
        .max()
        .unwrap_or(0)
        + COLUMN_GAP;

    let row = |prefix: &str, remote: &str, ahead: &str, tags: &str| {
        format!(
            "{:<pw$}{:<rw$}{:<aw$}{:<tw$}",
            prefix,
            remote,
            ahead,
            tags,
            pw = prefix_width,
            rw = remote_width,
            aw = AHEAD_WIDTH,
            tw = TAGS_WIDTH
        )
        .trim_end()
        .to_string()
    };

    let header = row("Prefix", "Remote", "Ahead By", "Tags Since");
    let mut out = if styled { underline(&header) } else { header };
    out.push('\n');

    for resolution in resolutions {
        let url = remote_url(resolution).unwrap_or_else(|| NO_REMOTE.to_string());
        let tags = resolution
            .remote()
            .map_or_else(|| NO_REMOTE.to_string(), |m| tags_label(&m.tags_since));
        out.push_str(&row(
            resolution.subtree.prefix(),
            &url,
            &ahead_by_label(resolution.state()),
            &tags,
        ));
        out.push('\n');
    }

    let failures: Vec<_> = resolutions
        .iter()
        .filter_map(|r| r.error().map(|e| (r.subtree.prefix(), e)))
        .collect();
    if !failures.is_empty() {
        out.push('\n');
        for (prefix, error) in failures {
            out.push_str(&format!("{}: {}\n", prefix, error));
        }
    }
    out
}
