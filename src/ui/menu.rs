use crate::methods::CleaningMethod;

pub const BANNER: &str = r"
    ____  _      __       ________
   / __ \(_)____/ /__    / ____/ /__  ____ _____  ___  _____
  / / / / / ___/ //_/   / /   / / _ \/ __ `/ __ \/ _ \/ ___/
 / /_/ / (__  ) ,<     / /___/ /  __/ /_/ / / / /  __/ /
/_____/_/____/_/|_|    \____/_/\___/\__,_/_/ /_/\___/_/
";

const RULE_WIDTH: usize = 70;

/// Numbered menu, one line per method, framed by rules.
pub fn render_menu() -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    for method in CleaningMethod::ALL {
        let tag = format!("[{}]", method.number());
        out.push_str(&format!(
            "{:<5}{} - {}\n",
            tag,
            method.title(),
            method.description()
        ));
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_all_methods_in_order() {
        let menu = render_menu();
        let entries: Vec<&str> = menu.lines().filter(|l| l.starts_with('[')).collect();
        assert_eq!(entries.len(), 11);
        assert!(entries[0].starts_with("[1]  Standard Clean - "));
        assert!(entries[10].starts_with("[11] Fractal Compression - "));
    }
}
