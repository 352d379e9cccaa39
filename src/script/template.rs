//! Fixed AutoIt text blocks for the remote desktop interaction.
//!
//! Every block is emitted at a zero-indent baseline; statements inside the
//! generated function carry a single 4-space level. Substituted values are
//! joined to the literal text by concatenation only, so AutoIt key names such
//! as `{ENTER}` never pass through Rust's formatting machinery.
//!
//! The control literals (window titles, key names, delays) are part of the
//! script dialect consumers expect and must stay byte-for-byte stable.

/// Prefix shared by the generated entry-point function and the task key.
pub const FUNCTION_PREFIX: &str = "RemoteDesktop_";

/// Indentation applied to the call-site section inside the function body.
pub const CALL_SITE_INDENT: &str = "        ";

const DECLARATION_HEAD: &str = concat!(
    "\n",
    "; < --------------------------------------- >\n",
    ";         RemoteDesktop Interaction        \n",
    "; < --------------------------------------- >\n",
    "\n",
);

const OPEN_PRELUDE: &str = r##"
    ; Creates a RemoteDesktop Interaction

    Send("#r")
    ; Wait 10 seconds for the Run dialogue window to appear.
    WinWaitActive("Run", "", 10)
    ; note this needs to be escaped
    ; <PROGRAM EXECUTION>
    Send("mstsc{ENTER}")
    WinWaitActive("Remote Destop Connection", "", 10)
    ;SendKeepActive("[CLASS:OpusApp]") get the name of this class
    ; Send ALT 'o' to open the RDP options
    Send("!o")
    Sleep(2000)
    ;Send ALT 'c' to focus to computer
    Send("!c")
    Sleep(2000)

    ; Send RDP Connection Informaiton
"##;

const OPEN_EPILOGUE: &str = r#"    Send("!y")

    ; pins the RDP connection as focus
    WinWaitActive("[CLASS:TscShellContainerClass]")
    SendKeepActive("[CLASS:TscShellContainerClass]")

    ; sends key strokes to RDP session to focus Windows key
    Send("{ALT}{HOME}")

"#;

const CLOSE_SEQUENCE: &str = r#"

    Send("{CAPSLOCK}")
    ; Need a short sleep here for focus to restore properly.
    Sleep(150)
    Send("{CAPSLOCK}")
    WinClose("[CLASS:TscShellContainerClass]")
    Sleep(50)
    ; probably need a check for the popup window based on visible text
    ControlClick("Remote Desktop Connection", "", "[Class:Button;Instance:1]")
    SendKeepActive("")

EndFunc

"#;

/// Delay after each typed credential, in milliseconds.
const ENTRY_DELAY: &str = "    Sleep(2000)\n";

/// Name of the generated function for a task index.
pub fn function_name(index: u32) -> String {
    let mut name = String::from(FUNCTION_PREFIX);
    name.push_str(&index.to_string());
    name
}

/// Banner comment plus the top-level call to the generated function.
pub fn declaration(index: u32) -> String {
    let mut out = String::from(DECLARATION_HEAD);
    out.push_str(&function_name(index));
    out.push_str("()\n\n");
    out
}

/// Opens the function and drives the connection dialog.
///
/// The credentials are placed inside AutoIt string literals as given; a value
/// containing `"` or a `Send` modifier changes the meaning of the generated
/// line. Use [`escape_send_text`] first when that is not wanted.
pub fn open_sequence(index: u32, computer: &str, username: &str, password: &str) -> String {
    let mut out = String::from("\n\nFunc ");
    out.push_str(&function_name(index));
    out.push_str("()\n");
    out.push_str(OPEN_PRELUDE);
    push_send(&mut out, computer, "{TAB}");
    push_send(&mut out, username, "{ENTER}");
    push_send(&mut out, password, "{ENTER}");
    out.push_str(OPEN_EPILOGUE);
    out
}

/// Restores focus, closes the session window and ends the function.
pub fn close_sequence() -> String {
    CLOSE_SEQUENCE.to_string()
}

fn push_send(out: &mut String, value: &str, key: &str) {
    out.push_str("    Send(\"");
    out.push_str(value);
    out.push_str(key);
    out.push_str("\")\n");
    out.push_str(ENTRY_DELAY);
}

/// Make a value safe to type through `Send("...")`.
///
/// Modifier characters are wrapped in braces so they are sent literally and
/// double quotes are doubled for the string literal.
pub fn escape_send_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '!' | '+' | '^' | '#' | '{' | '}' => {
                out.push('{');
                out.push(ch);
                out.push('}');
            }
            '"' => out.push_str("\"\""),
            _ => out.push(ch),
        }
    }
    out
}

/// Prefix every line that has visible content, leaving blank lines alone.
pub fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            out.push_str(prefix);
        }
        out.push_str(line);
    }
    out
}
