//! Package slices: groups of classes identified by the capture groups of a
//! [`PackagePattern`], with cross-slice dependency and cycle detection.

use crate::context::EvaluationContext;
use crate::model::{package_of, AccessEdge, Class};
use crate::packages::{PackagePattern, PatternError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Slice assignment for one pattern.
#[derive(Debug, Clone)]
pub struct Slices {
    pattern: PackagePattern,
    naming: Option<String>,
}

/// A dependency between two different slices.
#[derive(Debug, Clone)]
pub struct SliceDependency<'a> {
    /// Slice of the origin class.
    pub from: String,
    /// Slice of the target class.
    pub to: String,
    /// The underlying class-level edge.
    pub edge: &'a AccessEdge,
}

/// A dependency cycle between slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceCycle {
    /// Slices along the cycle, starting at the smallest name. The last
    /// slice depends on the first.
    pub slices: Vec<String>,
    /// One class-level edge per step of the cycle.
    pub edges: Vec<AccessEdge>,
}

impl fmt::Display for SliceCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slice in &self.slices {
            write!(f, "{slice} -> ")?;
        }
        match self.slices.first() {
            Some(first) => f.write_str(first),
            None => Ok(()),
        }
    }
}

impl Slices {
    /// Creates slices from a pattern with at least one capture group.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is malformed or captures nothing.
    pub fn matching(pattern: &str) -> Result<Self, PatternError> {
        let pattern = PackagePattern::new(pattern)?;
        if pattern.group_count() == 0 {
            return Err(PatternError {
                pattern: pattern.as_str().to_string(),
                reason: "slice patterns need at least one capture group, e.g. `com.example.(*)..`"
                    .to_string(),
            });
        }
        Ok(Self {
            pattern,
            naming: None,
        })
    }

    /// Names slices with a template where `$1`, `$2`, ... refer to captures.
    #[must_use]
    pub fn named(mut self, template: impl Into<String>) -> Self {
        self.naming = Some(template.into());
        self
    }

    /// The slice pattern.
    #[must_use]
    pub fn pattern(&self) -> &PackagePattern {
        &self.pattern
    }

    /// Slice name for a package, if the package belongs to a slice.
    #[must_use]
    pub fn slice_of_package(&self, package: &str) -> Option<String> {
        let captures = self.pattern.captures(package)?;
        Some(match &self.naming {
            Some(template) => {
                let mut name = template.clone();
                for (i, capture) in captures.iter().enumerate().rev() {
                    name = name.replace(&format!("${}", i + 1), capture);
                }
                name
            }
            None => captures.join("."),
        })
    }

    /// Slice name for a class.
    #[must_use]
    pub fn slice_of(&self, class: &Class) -> Option<String> {
        self.slice_of_package(class.package())
    }

    /// Classes in scope grouped by slice.
    #[must_use]
    pub fn members<'a>(&self, ctx: &EvaluationContext<'a>) -> BTreeMap<String, Vec<&'a Class>> {
        let mut members: BTreeMap<String, Vec<&Class>> = BTreeMap::new();
        for class in ctx.classes() {
            if let Some(slice) = self.slice_of(class) {
                members.entry(slice).or_default().push(class);
            }
        }
        members
    }

    /// Dependencies from classes in scope that cross slice boundaries.
    #[must_use]
    pub fn dependencies<'a>(&self, ctx: &EvaluationContext<'a>) -> Vec<SliceDependency<'a>> {
        ctx.dependencies()
            .filter_map(|edge| {
                let from = self.slice_of_package(package_of(&edge.origin))?;
                let to = self.slice_of_package(edge.target_package())?;
                (from != to).then_some(SliceDependency { from, to, edge })
            })
            .collect()
    }

    /// Elementary dependency cycles between slices, each starting at its
    /// smallest slice, sorted by slice sequence.
    ///
    /// At most [`MAX_CYCLES`] cycles are listed per strongly connected
    /// component.
    #[must_use]
    pub fn cycles(&self, ctx: &EvaluationContext<'_>) -> Vec<SliceCycle> {
        let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut witness: BTreeMap<(String, String), &AccessEdge> = BTreeMap::new();
        for SliceDependency { from, to, edge } in self.dependencies(ctx) {
            graph.entry(to.clone()).or_default();
            graph.entry(from.clone()).or_default().insert(to.clone());
            witness.entry((from, to)).or_insert(edge);
        }

        let mut cycles: Vec<SliceCycle> = strongly_connected(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .flat_map(|component| {
                let members: BTreeSet<&str> = component.into_iter().collect();
                elementary_cycles(&graph, &members)
            })
            .map(|slices| {
                let edges = slices
                    .iter()
                    .zip(slices.iter().cycle().skip(1))
                    .filter_map(|(from, to)| witness.get(&(from.clone(), to.clone())))
                    .map(|edge| (*edge).clone())
                    .collect();
                SliceCycle { slices, edges }
            })
            .collect();
        cycles.sort_by(|a, b| a.slices.cmp(&b.slices));
        cycles
    }
}

/// Upper bound on the cycles listed for one strongly connected component.
pub const MAX_CYCLES: usize = 100;

/// Tarjan's strongly connected components over a slice graph.
fn strongly_connected(graph: &BTreeMap<String, BTreeSet<String>>) -> Vec<Vec<&str>> {
    struct Tarjan<'g> {
        graph: &'g BTreeMap<String, BTreeSet<String>>,
        index: usize,
        indices: BTreeMap<&'g str, usize>,
        lowlink: BTreeMap<&'g str, usize>,
        stack: Vec<&'g str>,
        on_stack: BTreeSet<&'g str>,
        components: Vec<Vec<&'g str>>,
    }

    impl<'g> Tarjan<'g> {
        fn visit(&mut self, node: &'g str) {
            self.indices.insert(node, self.index);
            self.lowlink.insert(node, self.index);
            self.index += 1;
            self.stack.push(node);
            self.on_stack.insert(node);

            let graph = self.graph;
            for next in graph.get(node).into_iter().flatten() {
                let next = next.as_str();
                if !self.indices.contains_key(next) {
                    self.visit(next);
                    let low = self.lowlink[node].min(self.lowlink[next]);
                    self.lowlink.insert(node, low);
                } else if self.on_stack.contains(next) {
                    let low = self.lowlink[node].min(self.indices[next]);
                    self.lowlink.insert(node, low);
                }
            }

            if self.lowlink[node] == self.indices[node] {
                let mut component = Vec::new();
                while let Some(member) = self.stack.pop() {
                    self.on_stack.remove(member);
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }

    let mut tarjan = Tarjan {
        graph,
        index: 0,
        indices: BTreeMap::new(),
        lowlink: BTreeMap::new(),
        stack: Vec::new(),
        on_stack: BTreeSet::new(),
        components: Vec::new(),
    };
    for node in graph.keys() {
        if !tarjan.indices.contains_key(node.as_str()) {
            tarjan.visit(node);
        }
    }
    tarjan.components
}

/// Enumerates the elementary cycles of one component.
///
/// A cycle is found only from its smallest slice, so every cycle appears
/// once, already rotated.
fn elementary_cycles(
    graph: &BTreeMap<String, BTreeSet<String>>,
    members: &BTreeSet<&str>,
) -> Vec<Vec<String>> {
    struct Search<'g> {
        graph: &'g BTreeMap<String, BTreeSet<String>>,
        members: &'g BTreeSet<&'g str>,
        start: &'g str,
        path: Vec<&'g str>,
        cycles: Vec<Vec<String>>,
    }

    impl<'g> Search<'g> {
        fn extend(&mut self, node: &'g str) {
            let (graph, members, start) = (self.graph, self.members, self.start);
            let successors = graph
                .get(node)
                .into_iter()
                .flatten()
                .map(String::as_str)
                .filter(|next| *next >= start && members.contains(next));
            for next in successors {
                if self.cycles.len() >= MAX_CYCLES {
                    return;
                }
                if next == start {
                    self.cycles
                        .push(self.path.iter().map(|s| (*s).to_string()).collect());
                } else if !self.path.contains(&next) {
                    self.path.push(next);
                    self.extend(next);
                    self.path.pop();
                }
            }
        }
    }

    let mut search = Search {
        graph,
        members,
        start: "",
        path: Vec::new(),
        cycles: Vec::new(),
    };
    for &start in members {
        search.start = start;
        search.path = vec![start];
        search.extend(start);
    }
    if search.cycles.len() >= MAX_CYCLES {
        tracing::warn!(limit = MAX_CYCLES, "Slice cycle listing truncated");
    }
    search.cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModelScope;
    use crate::model::CodeModel;

    fn layered(edges: &[(&str, &str)]) -> CodeModel {
        let mut builder = CodeModel::builder();
        for layer in ["web", "service", "persistence", "util"] {
            builder = builder.class(Class::new(format!("com.example.demo.{layer}.Type")));
        }
        for (from, to) in edges {
            builder = builder.calls(
                &format!("com.example.demo.{from}.Type"),
                &format!("com.example.demo.{to}.Type"),
            );
        }
        builder.build().unwrap()
    }

    #[test]
    fn pattern_without_capture_is_rejected() {
        assert!(Slices::matching("com.example..").is_err());
    }

    #[test]
    fn naming_template_substitutes_captures() {
        let slices = Slices::matching("com.example.(*service).domain")
            .unwrap()
            .named("Service $1");
        assert_eq!(
            slices.slice_of_package("com.example.userservice.domain"),
            Some("Service userservice".to_string())
        );
    }

    #[test]
    fn dependencies_skip_intra_slice_edges() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.demo.web.A"))
            .class(Class::new("com.example.demo.web.B"))
            .class(Class::new("com.example.demo.service.C"))
            .calls("com.example.demo.web.A", "com.example.demo.web.B")
            .calls("com.example.demo.web.A", "com.example.demo.service.C")
            .build()
            .unwrap();
        let scope = ModelScope::default();
        let ctx = EvaluationContext::new(&model, &scope);

        let deps = Slices::matching("com.example.demo.(*)..")
            .unwrap()
            .dependencies(&ctx);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].from, "web");
        assert_eq!(deps[0].to, "service");
    }

    #[test]
    fn acyclic_layers_have_no_cycles() {
        let model = layered(&[("web", "service"), ("service", "persistence"), ("web", "util")]);
        let scope = ModelScope::default();
        let ctx = EvaluationContext::new(&model, &scope);

        let slices = Slices::matching("com.example.demo.(*)..").unwrap();
        assert!(slices.cycles(&ctx).is_empty());
    }

    #[test]
    fn reports_every_elementary_cycle() {
        let model = layered(&[
            ("web", "service"),
            ("service", "persistence"),
            ("persistence", "web"),
            ("service", "web"),
        ]);
        let scope = ModelScope::default();
        let ctx = EvaluationContext::new(&model, &scope);

        let cycles = Slices::matching("com.example.demo.(*)..")
            .unwrap()
            .cycles(&ctx);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].slices, vec!["persistence", "web", "service"]);
        assert_eq!(cycles[0].edges.len(), 3);
        assert_eq!(cycles[0].to_string(), "persistence -> web -> service -> persistence");
        assert_eq!(cycles[1].slices, vec!["service", "web"]);
        assert_eq!(cycles[1].to_string(), "service -> web -> service");
    }

    #[test]
    fn cycles_are_deterministic() {
        let model = layered(&[
            ("web", "service"),
            ("service", "web"),
            ("util", "persistence"),
            ("persistence", "util"),
        ]);
        let scope = ModelScope::default();
        let ctx = EvaluationContext::new(&model, &scope);
        let slices = Slices::matching("com.example.demo.(*)..").unwrap();

        let first = slices.cycles(&ctx);
        assert_eq!(first.len(), 2);
        assert_eq!(first, slices.cycles(&ctx));
    }

    #[test]
    fn lists_both_cycles_sharing_a_slice() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.a.A"))
            .class(Class::new("com.example.b.B"))
            .class(Class::new("com.example.c.C"))
            .calls("com.example.a.A", "com.example.b.B")
            .calls("com.example.b.B", "com.example.a.A")
            .calls("com.example.b.B", "com.example.c.C")
            .calls("com.example.c.C", "com.example.b.B")
            .build()
            .unwrap();
        let scope = ModelScope::default();
        let ctx = EvaluationContext::new(&model, &scope);

        let cycles = Slices::matching("com.example.(*)..").unwrap().cycles(&ctx);
        let rendered: Vec<String> = cycles.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a -> b -> a", "b -> c -> b"]);
    }
}
