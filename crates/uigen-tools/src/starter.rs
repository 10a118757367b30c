//! Starter projects expressed as tool-call scripts.
//!
//! Each starter is the sequence of calls an agent would issue to build it:
//! create the component, refine it with `str_replace`, then create the
//! `/App.jsx` entrypoint that renders it. Replaying a script through
//! [`ToolCall::execute`] exercises the same path as a live agent.

use crate::call::{ToolCall, ToolOutput};
use crate::types::TextEditorParams;
use std::fmt;
use std::str::FromStr;
use uigen_files::VirtualFileSystem;

/// A starter project.
///
/// # Examples
///
/// ```
/// use uigen_files::VirtualFileSystem;
/// use uigen_tools::Starter;
///
/// let mut vfs = VirtualFileSystem::new();
/// let outputs = Starter::Counter.apply(&mut vfs);
///
/// assert!(outputs.iter().all(|o| !o.is_error()));
/// assert!(vfs.exists("/App.jsx"));
/// assert!(vfs.exists("/components/Counter.jsx"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Starter {
    /// `/App.jsx` only
    #[default]
    Blank,
    /// Stateful counter
    Counter,
    /// Pricing card
    Card,
    /// Contact form with submit state
    ContactForm,
}

struct Component {
    name: &'static str,
    source: &'static str,
    refine: (&'static str, &'static str),
}

const COUNTER: Component = Component {
    name: "Counter",
    source: include_str!("../starters/Counter.jsx"),
    refine: (
        ">Counter</h2>",
        ">Counter</h2>\n      <p className=\"text-sm text-gray-500\">Click the buttons to change the value</p>",
    ),
};

const CARD: Component = Component {
    name: "Card",
    source: include_str!("../starters/Card.jsx"),
    refine: ("Choose plan</button>", "Get started</button>"),
};

const CONTACT_FORM: Component = Component {
    name: "ContactForm",
    source: include_str!("../starters/ContactForm.jsx"),
    refine: (">Contact us</h2>", ">Get in touch</h2>"),
};

const BLANK_APP: &str = "export default function App() {
  return (
    <div className=\"flex min-h-screen items-center justify-center bg-gray-100\">
      <h1 className=\"text-3xl font-bold text-gray-800\">Hello from UIGen</h1>
    </div>
  );
}
";

impl Starter {
    /// Every starter, in display order.
    pub const ALL: [Self; 4] = [Self::Blank, Self::Counter, Self::Card, Self::ContactForm];

    /// Returns the starter's name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Counter => "counter",
            Self::Card => "card",
            Self::ContactForm => "contact-form",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Blank => "An empty App.jsx",
            Self::Counter => "A counter with increase and decrease buttons",
            Self::Card => "A pricing card with a feature list",
            Self::ContactForm => "A contact form with a thank-you state",
        }
    }

    const fn component(self) -> Option<&'static Component> {
        match self {
            Self::Blank => None,
            Self::Counter => Some(&COUNTER),
            Self::Card => Some(&CARD),
            Self::ContactForm => Some(&CONTACT_FORM),
        }
    }

    /// Tool calls that build the starter.
    #[must_use]
    pub fn calls(self) -> Vec<ToolCall> {
        let Some(component) = self.component() else {
            return vec![ToolCall::TextEditor(TextEditorParams::create(
                "/App.jsx", BLANK_APP,
            ))];
        };

        let path = format!("/components/{}.jsx", component.name);
        let (old, new) = component.refine;
        let app = format!(
            "import {name} from '@/components/{name}';

export default function App() {{
  return (
    <div className=\"flex min-h-screen items-center justify-center bg-gray-100 p-4\">
      <{name} />
    </div>
  );
}}
",
            name = component.name
        );

        vec![
            ToolCall::TextEditor(TextEditorParams::create(&path, component.source)),
            ToolCall::TextEditor(TextEditorParams::str_replace(&path, old, new)),
            ToolCall::TextEditor(TextEditorParams::create("/App.jsx", app)),
        ]
    }

    /// Replays the starter's calls against `vfs`.
    pub fn apply(self, vfs: &mut VirtualFileSystem) -> Vec<ToolOutput> {
        self.calls().iter().map(|call| call.execute(vfs)).collect()
    }
}

impl fmt::Display for Starter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Starter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|starter| starter.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("Unknown starter '{s}'. Expected one of: {}", names.join(", "))
            })
    }
}
