/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Chart palette, cycled per label.
pub const PALETTE: [&str; 5] = [BLUE, GREEN, YELLOW, RED, MAGENTA];

pub fn palette(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// Color for a client tag in tables and cards.
pub fn color_for_client(cliente: &str) -> &'static str {
    match cliente.to_uppercase().as_str() {
        "TGS" => BLUE,
        "EDIFICIOS" => MAGENTA,
        "VTV" => GREEN,
        "BARRIOS" => YELLOW,
        _ => CYAN,
    }
}

/// Greys out placeholder values ("-", "Sin Fecha", empty).
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "-" || v.starts_with("Sin ") {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
