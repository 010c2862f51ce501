//! Static table of shell tips.
//!
//! Tip content uses backticks to mark commands; renderers decide how to
//! style them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    pub title: &'static str,
    pub content: &'static str,
}

pub const TIPS: &[Tip] = &[
    Tip {
        title: "Quick Jump to Last Argument",
        content: "Use `!$` in your shell to reference the last argument of your previous command.\nExample: `mkdir my_folder && cd !$`",
    },
    Tip {
        title: "Reverse Search History",
        content: "Press `Ctrl + R` to search through your command history instantly. It's much faster than pressing the up arrow!",
    },
    Tip {
        title: "The Magic of 'sudo !!'",
        content: "Forgot to use sudo? Just type `sudo !!` to run the previous command with root privileges.",
    },
    Tip {
        title: "Empty a File Quickly",
        content: "To clear all content from a file without deleting it, use: `> filename`",
    },
    Tip {
        title: "List by Size",
        content: "Want to find the biggest files? Use `ls -lS` to sort the directory listing by file size.",
    },
    Tip {
        title: "Check Your Disk Space",
        content: "Use `df -h` to see how much space is left on your drives in a human-readable format.",
    },
    Tip {
        title: "Monitor Logs in Real-Time",
        content: "Use `tail -f /path/to/logfile` to watch new lines being added to a log file as they happen.",
    },
    Tip {
        title: "Create Nested Directories",
        content: "Use `mkdir -p path/to/deep/folder` to create all parent directories at once.",
    },
    Tip {
        title: "Run in Background",
        content: "Add an `&` at the end of a command to run it in the background.\nExample: `gedit file.txt &`",
    },
    Tip {
        title: "Process Resource Map",
        content: "Run `top` or `htop` to see exactly what is eating your CPU and RAM in real-time.",
    },
];

/// Picks a tip from `table` using `seed` as the only source of randomness.
///
/// The same seed always selects the same tip. Returns `None` for an empty
/// table.
pub fn pick_tip(table: &[Tip], seed: u64) -> Option<&Tip> {
    if table.is_empty() {
        return None;
    }
    let index = (splitmix64(seed) % table.len() as u64) as usize;
    table.get(index)
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
