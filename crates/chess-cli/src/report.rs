//! Text and JSON rendering of search results.

use chess_engine::{line_to_san, Position};
use chess_search::{is_mate_score, SearchReport};
use serde::Serialize;

/// JSON form of a finished analysis.
#[derive(Debug, Serialize)]
pub struct AnalysisJson {
    /// Position analyzed, as FEN.
    pub fen: String,
    /// Deepest completed depth.
    pub depth: u32,
    /// White-positive centipawns.
    pub evaluation: i32,
    /// Side that forces mate, if any: "white" or "black".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mate: Option<&'static str>,
    /// Principal line in SAN.
    pub line: Vec<String>,
    /// Principal line in coordinate notation.
    pub line_coordinates: Vec<String>,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub cancelled: bool,
}

impl AnalysisJson {
    pub fn new(position: &Position, report: &SearchReport) -> Self {
        let mate = is_mate_score(report.evaluation).then_some(if report.evaluation > 0 {
            "white"
        } else {
            "black"
        });
        AnalysisJson {
            fen: position.to_fen(),
            depth: report.depth,
            evaluation: report.evaluation,
            mate,
            line: line_to_san(position, &report.line),
            line_coordinates: report.line.iter().map(|m| m.to_coordinate()).collect(),
            nodes: report.nodes,
            elapsed_ms: report.elapsed.as_millis() as u64,
            cancelled: report.cancelled,
        }
    }
}

/// Formats an evaluation as pawns (`+0.35`) or a mate announcement (`#+`, `#-`).
pub fn format_evaluation(evaluation: i32) -> String {
    if is_mate_score(evaluation) {
        let sign = if evaluation > 0 { '+' } else { '-' };
        format!("#{}", sign)
    } else {
        format!("{:+.2}", evaluation as f64 / 100.0)
    }
}

/// Human-readable summary of a search.
pub fn format_report(position: &Position, report: &SearchReport) -> String {
    let line = line_to_san(position, &report.line).join(" ");
    let mut out = format!(
        "depth {} eval {} nodes {} time {}ms\nline {}",
        report.depth,
        format_evaluation(report.evaluation),
        report.nodes,
        report.elapsed.as_millis(),
        if line.is_empty() { "-" } else { &line },
    );
    if report.cancelled {
        out.push_str("\n(cancelled)");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_search::{SearchConfig, Searcher, MATE_SCORE};

    #[test]
    fn evaluation_formats() {
        assert_eq!(format_evaluation(35), "+0.35");
        assert_eq!(format_evaluation(-120), "-1.20");
        assert_eq!(format_evaluation(0), "+0.00");
        assert_eq!(format_evaluation(MATE_SCORE), "#+");
        assert_eq!(format_evaluation(-MATE_SCORE), "#-");
    }

    #[test]
    fn json_reports_mate_line() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let report = Searcher::new(SearchConfig::default()).search(&position, 1);
        let json = serde_json::to_value(AnalysisJson::new(&position, &report)).unwrap();

        assert_eq!(json["mate"], "white");
        assert_eq!(json["line"][0], "Ra8#");
        assert_eq!(json["line_coordinates"][0], "a1a8");
        assert_eq!(json["depth"], 1);
        assert_eq!(json["cancelled"], false);
    }

    #[test]
    fn json_omits_mate_when_none() {
        let position = Position::startpos();
        let report = Searcher::new(SearchConfig::default()).search(&position, 1);
        let json = serde_json::to_value(AnalysisJson::new(&position, &report)).unwrap();
        assert!(json.get("mate").is_none());
    }

    #[test]
    fn text_report_lists_line() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let report = Searcher::new(SearchConfig::default()).search(&position, 1);
        let text = format_report(&position, &report);
        assert!(text.contains("eval #+"));
        assert!(text.ends_with("line Ra8#"));
    }
}
