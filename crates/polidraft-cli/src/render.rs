//! Terminal rendering for transcripts, people cards and the network graph.

use colored::Colorize;
use polidraft_core::chat::{ChatMessage, ChatSession, MessageRole, PeopleCard, SearchType};
use polidraft_core::flow::{FlowState, FlowStep};
use polidraft_core::graph::{radial_layout, short_label, LayoutParams, NetworkGraph};
use polidraft_gateway::types::CoworkerProfile;
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Prints the transcript of the active session.
///
/// Assistant replies to network searches are not printed; the people
/// card bound to the triggering user message takes their place.
pub fn print_transcript(messages: &[ChatMessage], cards: &HashMap<String, PeopleCard>) {
    for message in messages {
        match message.role {
            MessageRole::User => {
                let tag = match message.search_type {
                    Some(SearchType::Fact) => " [fact]",
                    Some(SearchType::Network) => " [network]",
                    None => "",
                };
                println!("{}{}", format!("> {}", message.content).green(), tag.bright_black());
                if let Some(card) = cards.get(&message.id) {
                    print_card(card);
                }
            }
            MessageRole::Assistant => {
                if message.search_type == Some(SearchType::Network) {
                    continue;
                }
                for line in message.content.lines() {
                    println!("{}", line.bright_blue());
                }
            }
        }
    }
}

/// Prints one people-search card.
pub fn print_card(card: &PeopleCard) {
    if card.is_loading {
        println!("{}", format!("  [検索中… {}]", card.query).bright_black());
        return;
    }
    println!("{}", format!("  ── 人材検索: {} ──", card.query).bright_magenta());
    if let Some(narrative) = &card.narrative {
        for line in narrative.lines() {
            println!("  {}", line.bright_blue());
        }
    }
    if card.items.is_empty() {
        println!("{}", "  データがありません".bright_black());
        return;
    }
    for (i, candidate) in card.items.iter().enumerate() {
        let mut line = format!("  {}. {}", i + 1, candidate.name);
        if let Some(company) = &candidate.company {
            line.push_str(&format!(" / {}", company));
        }
        if let Some(department) = &candidate.department {
            line.push_str(&format!(" / {}", department));
        }
        if let Some(score) = candidate.score {
            line.push_str(&format!(" (score {:.2})", score));
        }
        println!("{}", line.cyan());
        if let Some(skills) = &candidate.skills {
            if !skills.is_empty() {
                println!("{}", format!("     skills: {}", skills).bright_black());
            }
        }
    }
}

/// Prints the session list, newest first, marking the active one.
pub fn print_sessions(sessions: &[ChatSession], active_id: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No sessions yet.".bright_black());
        return;
    }
    for (i, session) in sessions.iter().enumerate() {
        let marker = if Some(session.id.as_str()) == active_id {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:>2}. {}  {}",
            marker.bright_yellow(),
            i + 1,
            session.title,
            format!("({} messages)", session.messages.len()).bright_black(),
        );
    }
}

/// Prints the flow progress of a session, one line per step.
pub fn print_flow_state(state: &FlowState) {
    for step in FlowStep::iter() {
        let mark = if state.result_for(step).is_some() {
            "✔".green()
        } else {
            "・".bright_black()
        };
        let current = state.last_updated_step.as_deref() == Some(&step.to_string());
        let name = format!("{} {}", step, step.label());
        if current {
            println!("{} {}", mark, name.bright_yellow());
        } else {
            println!("{} {}", mark, name);
        }
        if let Some(result) = state.result_for(step) {
            for line in result.lines().take(3) {
                println!("    {}", line.bright_black());
            }
        }
    }
}

/// Renders the radial network graph as a character grid.
///
/// Edges are listed below the grid rather than drawn, which keeps the
/// layout readable at terminal resolution.
pub fn graph_grid(graph: &NetworkGraph, width: usize, height: usize) -> String {
    let params = LayoutParams {
        width: width as f64,
        height: height as f64,
        radius_ratio: 0.38,
        node_radius: 1.0,
        center_radius: 1.0,
    };
    let placed = radial_layout(graph, &params);
    if placed.is_empty() {
        return String::new();
    }

    let mut grid = vec![vec![' '; width]; height];
    for node in &placed {
        let col = node.x.round() as usize;
        let row = node.y.round() as usize;
        if row >= height || col >= width {
            continue;
        }
        grid[row][col] = if node.is_center { '@' } else { 'o' };
        let label = short_label(&node.label);
        for (offset, ch) in label.chars().enumerate() {
            let c = col + 2 + offset;
            if c >= width {
                break;
            }
            grid[row][c] = ch;
        }
    }

    let mut out = String::new();
    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Prints the graph grid plus the edge list.
pub fn print_graph(graph: &NetworkGraph) {
    if graph.nodes.is_empty() {
        println!("{}", "ネットワーク情報はありません".bright_black());
        return;
    }
    print!("{}", graph_grid(graph, 72, 18));
    for edge in &graph.edges {
        let source = node_label(graph, &edge.source);
        let target = node_label(graph, &edge.target);
        match &edge.label {
            Some(label) => {
                println!("{}", format!("  {} - {} ({})", source, target, label).bright_black())
            }
            None => println!("{}", format!("  {} - {}", source, target).bright_black()),
        }
    }
}

/// Prints a coworker profile with both history lists.
pub fn print_profile(profile: &CoworkerProfile) {
    let mut heading = profile.name.clone();
    if let Some(title) = &profile.title {
        heading.push_str(&format!(" / {}", title));
    }
    if let Some(department) = &profile.department {
        heading.push_str(&format!(" / {}", department));
    }
    println!("{}", heading.bright_yellow().bold());
    if !profile.work_history.is_empty() {
        println!("{}", "職歴".bright_magenta());
        for entry in &profile.work_history {
            println!("  {}  {}", entry.period.bright_black(), entry.text);
        }
    }
    if !profile.project_history.is_empty() {
        println!("{}", "プロジェクト歴".bright_magenta());
        for entry in &profile.project_history {
            println!("  {}  {}", entry.period.bright_black(), entry.text);
        }
    }
}

fn node_label<'a>(graph: &'a NetworkGraph, id: &'a str) -> &'a str {
    graph
        .nodes
        .iter()
        .find(|n| n.id == id)
        .map(|n| n.label.as_str())
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polidraft_core::graph::{GraphEdge, GraphNode, CENTER_KIND};

    fn sample_graph() -> NetworkGraph {
        NetworkGraph {
            nodes: vec![
                GraphNode {
                    id: "hub".to_string(),
                    label: "佐藤".to_string(),
                    kind: Some(CENTER_KIND.to_string()),
                },
                GraphNode {
                    id: "cw:1".to_string(),
                    label: "鈴木".to_string(),
                    kind: None,
                },
                GraphNode {
                    id: "cw:2".to_string(),
                    label: "田中".to_string(),
                    kind: None,
                },
            ],
            edges: vec![GraphEdge {
                source: "hub".to_string(),
                target: "cw:1".to_string(),
                label: None,
            }],
        }
    }

    #[test]
    fn test_graph_grid_places_every_label() {
        let grid = graph_grid(&sample_graph(), 72, 18);
        assert!(grid.contains('@'));
        assert!(grid.contains("佐藤"));
        assert!(grid.contains("鈴木"));
        assert!(grid.contains("田中"));
    }

    #[test]
    fn test_graph_grid_has_the_requested_height() {
        let grid = graph_grid(&sample_graph(), 40, 10);
        assert_eq!(grid.lines().count(), 10);
    }

    #[test]
    fn test_empty_graph_renders_nothing() {
        assert!(graph_grid(&NetworkGraph::default(), 40, 10).is_empty());
    }
}
