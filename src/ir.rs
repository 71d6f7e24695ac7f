/// Which flavour of the chart notation a document is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notation {
    /// evidence / inference / conclusion nodes, support / contradict edges.
    Simple,
    /// All five node kinds, support / explain / refute edges.
    Extended,
    /// Union of both.
    #[default]
    Combined,
}

impl Notation {
    pub fn accepts_node(self, kind: NodeKind) -> bool {
        match self {
            Notation::Simple => matches!(
                kind,
                NodeKind::Evidence | NodeKind::Inference | NodeKind::Conclusion
            ),
            Notation::Extended | Notation::Combined => true,
        }
    }

    pub fn accepts_edge(self, kind: EdgeKind) -> bool {
        match self {
            Notation::Simple => matches!(kind, EdgeKind::Support | EdgeKind::Contradict),
            Notation::Extended => {
                matches!(kind, EdgeKind::Support | EdgeKind::Explain | EdgeKind::Refute)
            }
            Notation::Combined => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Evidence,
    Inference,
    Conclusion,
    Explanation,
    Refutation,
}

impl NodeKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "evidence" => Some(Self::Evidence),
            "inference" => Some(Self::Inference),
            "conclusion" => Some(Self::Conclusion),
            "explanation" => Some(Self::Explanation),
            "refutation" => Some(Self::Refutation),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Evidence => "evidence",
            Self::Inference => "inference",
            Self::Conclusion => "conclusion",
            Self::Explanation => "explanation",
            Self::Refutation => "refutation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    Support,
    Contradict,
    Explain,
    Refute,
}

impl EdgeKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "support" => Some(Self::Support),
            "contradict" => Some(Self::Contradict),
            "explain" => Some(Self::Explain),
            "refute" => Some(Self::Refute),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Contradict => "contradict",
            Self::Explain => "explain",
            Self::Refute => "refute",
        }
    }
}

/// Provenance of an evidentiary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// `*`: observed directly by the tribunal.
    Observed,
    /// `q`: judicially noticed.
    Noticed,
}

impl Source {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "*" => Some(Self::Observed),
            "q" | "Q" => Some(Self::Noticed),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Observed => "*",
            Self::Noticed => "q",
        }
    }
}

/// Degree of belief assigned to a proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Belief {
    StrongBelief,
    Belief,
    Doubt,
    Disbelief,
    StrongDisbelief,
}

impl Belief {
    pub const ALL: [Belief; 5] = [
        Belief::StrongBelief,
        Belief::Belief,
        Belief::Doubt,
        Belief::Disbelief,
        Belief::StrongDisbelief,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL.into_iter().find(|belief| belief.symbol() == token)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::StrongBelief => "++",
            Self::Belief => "+",
            Self::Doubt => "?",
            Self::Disbelief => "-",
            Self::StrongDisbelief => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strength {
    Strong,
    Weak,
}

impl Strength {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "strong" => Some(Self::Strong),
            "weak" => Some(Self::Weak),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
        }
    }
}

/// A node line exactly as it was read, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNode {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub source: Option<String>,
    pub belief: Option<String>,
}

/// An edge line exactly as it was read, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    pub kind: String,
    pub strength: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChart {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub source: Option<Source>,
    pub belief: Option<Belief>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub strength: Option<Strength>,
}

/// Validated chart contents. Ids are unique and every edge endpoint names a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }
}
