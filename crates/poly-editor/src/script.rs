//! Gesture scripts for the headless editor.
//!
//! One event per line, `#` starts a comment:
//!
//! ```text
//! key e            # switch to polygon creation
//! dbl 10 10
//! dbl 90 10
//! dbl 50 80
//! key q
//! down 90 10
//! move 95 20
//! move 100 30 ctrl # Control held: drag the whole polygon
//! up
//! ```
//!
//! `up` without coordinates releases where the pointer last was.

use crate::input::InputEvent;

/// Parse a whole script. Errors name the 1-based line.
pub fn parse_script(source: &str) -> Result<Vec<InputEvent>, String> {
    let mut events = Vec::new();
    let mut last = (0.0, 0.0);
    for (index, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let event = parse_line(line, last).map_err(|err| format!("line {}: {err}", index + 1))?;
        if let Some(p) = event.position() {
            last = (p.x, p.y);
        }
        events.push(event);
    }
    Ok(events)
}

fn parse_line(line: &str, last: (f64, f64)) -> Result<InputEvent, String> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or("empty line")?;
    let args: Vec<&str> = words.collect();
    let event = match command {
        "down" => {
            let (x, y) = coords(&args)?;
            expect_len(&args, 2)?;
            InputEvent::PointerDown { x, y }
        }
        "move" => {
            let (x, y) = coords(&args)?;
            let ctrl = match args.get(2) {
                None => false,
                Some(&"ctrl") => true,
                Some(other) => return Err(format!("unknown modifier `{other}`")),
            };
            expect_len(&args, if ctrl { 3 } else { 2 })?;
            InputEvent::PointerMove { x, y, ctrl }
        }
        "up" => {
            let (x, y) = if args.is_empty() { last } else { coords(&args)? };
            expect_len(&args, if args.is_empty() { 0 } else { 2 })?;
            InputEvent::PointerUp { x, y }
        }
        "dbl" => {
            let (x, y) = coords(&args)?;
            expect_len(&args, 2)?;
            InputEvent::DoubleClick { x, y }
        }
        "key" => {
            expect_len(&args, 1)?;
            let key = match args[0] {
                "space" => " ",
                other => other,
            };
            InputEvent::key(key)
        }
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(event)
}

fn coords(args: &[&str]) -> Result<(f64, f64), String> {
    let number = |i: usize| -> Result<f64, String> {
        let word = args.get(i).ok_or("expected `x y` coordinates")?;
        word.parse::<f64>()
            .map_err(|_| format!("`{word}` is not a number"))
    };
    Ok((number(0)?, number(1)?))
}

fn expect_len(args: &[&str], len: usize) -> Result<(), String> {
    if args.len() > len {
        return Err(format!("unexpected `{}`", args[len]));
    }
    Ok(())
}
