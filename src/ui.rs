use anyhow::Result;
use console::{Key, Term, style};
use dialoguer::{Confirm, Input, Password};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
}

/// Clears the screen, draws `items`, and reads one selection.
///
/// The first key picks the input mode: arrows enter cursor navigation, any
/// other printable key starts a typed number. Bad input redraws the menu.
pub fn prompt_menu<S: AsRef<str>>(
    prompt: &str,
    items: &[S],
    default: Option<usize>,
    header: Option<&str>,
    status: Option<&str>,
) -> Result<MenuChoice> {
    let term = Term::stdout();
    let mut status: Option<String> = status.map(str::to_string);
    loop {
        let _ = term.clear_screen();
        print_heading(header, prompt, status.as_deref());
        for (i, it) in items.iter().enumerate() {
            println!("{}: {}", i + 1, it.as_ref());
        }
        if items.is_empty() {
            println!("{}", style("(nothing here)").dim());
        }
        println!("Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit.");

        let typed = match term.read_key()? {
            Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End | Key::PageUp | Key::PageDown
                if !items.is_empty() =>
            {
                return arrow_select(&term, prompt, items, default, header);
            }
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            Key::Enter => String::new(),
            Key::Char(c) if !c.is_control() => Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .with_initial_text(c.to_string())
                .interact_text()?,
            _ => Input::new()
                .with_prompt("Selection")
                .allow_empty(true)
                .interact_text()?,
        };
        match parse_selection(&typed, items.len(), default) {
            Some(choice) => return Ok(choice),
            None => status = Some(format!("invalid selection: {:?}", typed.trim())),
        }
    }
}

fn print_heading(header: Option<&str>, prompt: &str, status: Option<&str>) {
    if let Some(h) = header {
        println!("{}", h);
    }
    println!("{}", style(prompt).bold());
    if let Some(s) = status {
        println!("{}", style(s).yellow());
    }
}

fn parse_selection(input: &str, len: usize, default: Option<usize>) -> Option<MenuChoice> {
    let s = input.trim();
    if s.is_empty() {
        return default.map(MenuChoice::Index);
    }
    if s.eq_ignore_ascii_case("q") {
        return Some(MenuChoice::Quit);
    }
    if s.eq_ignore_ascii_case("b") {
        return Some(MenuChoice::Back);
    }
    let idx: usize = s.parse().ok()?;
    if idx == 0 || idx > len {
        return None;
    }
    Some(MenuChoice::Index(idx - 1))
}

fn arrow_select<S: AsRef<str>>(
    term: &Term,
    prompt: &str,
    items: &[S],
    default: Option<usize>,
    header: Option<&str>,
) -> Result<MenuChoice> {
    let last = items.len().saturating_sub(1);
    let mut sel = default.unwrap_or(0).min(last);
    let mut top: usize = 0;
    loop {
        term.clear_screen()?;
        print_heading(header, prompt, None);

        let (rows, _cols) = term.size();
        // header + prompt + help
        let reserved: usize = 2 + usize::from(header.is_some());
        let max_visible = (rows as usize).saturating_sub(reserved).max(3).min(items.len());

        if sel < top {
            top = sel;
        }
        if sel >= top + max_visible {
            top = sel + 1 - max_visible;
        }

        let end = (top + max_visible).min(items.len());
        for (i, it) in items.iter().enumerate().take(end).skip(top) {
            let marker = if i == sel { ">" } else { " " };
            println!("{} {}: {}", marker, i + 1, it.as_ref());
        }
        println!("Use arrows + Enter. 'b' = back, 'q' = quit.");

        let step = max_visible.saturating_sub(1).max(1);
        match term.read_key()? {
            Key::ArrowUp => sel = sel.saturating_sub(1),
            Key::ArrowDown => sel = (sel + 1).min(last),
            Key::Home => sel = 0,
            Key::End => sel = last,
            Key::PageUp => sel = sel.saturating_sub(step),
            Key::PageDown => sel = (sel + step).min(last),
            Key::Enter => return Ok(MenuChoice::Index(sel)),
            Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
            _ => {}
        }
    }
}

/// A required form field; re-asks until non-blank.
pub fn prompt_text(label: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(label)
        .validate_with(|s: &String| {
            if s.trim().is_empty() {
                Err("required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_string())
}

pub fn prompt_password(label: &str) -> Result<String> {
    Ok(Password::new().with_prompt(label).interact()?)
}

pub fn confirm(question: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(question).default(false).interact()?)
}
