//! Checklist page builder for tests.

use std::fmt::Write;

/// A checklist page with every field toggleable. The default page carries
/// every field any protocol can ask for.
#[derive(Debug, Clone)]
pub struct ChecklistPage {
    pub identifier: Option<&'static str>,
    pub status: &'static str,
    pub timestamp: Option<&'static str>,
    pub protocol: &'static str,
    pub duration: Option<&'static str>,
    pub distance: Option<&'static str>,
    pub area: Option<&'static str>,
    pub party_size: Option<&'static str>,
    pub owner: Option<&'static str>,
    /// `false` leaves the others container out entirely.
    pub others_container: bool,
    /// `None` renders an entry with no name in it.
    pub others: Vec<Option<&'static str>>,
    pub hotspot: Option<(&'static str, &'static str)>,
    pub regions: Vec<(&'static str, &'static str)>,
    pub coordinates: &'static str,
    /// `None` leaves the list container out entirely.
    pub entries: Option<Vec<(&'static str, &'static str)>>,
}

impl Default for ChecklistPage {
    fn default() -> Self {
        Self {
            identifier: Some("S12345678"),
            status: "Complete",
            timestamp: Some("2023-05-14T07:00"),
            protocol: "Stationary",
            duration: Some("30"),
            distance: Some("2.5 kilometer(s)"),
            area: Some("4.5 hectares"),
            party_size: Some("2"),
            owner: Some("Jane Doe"),
            others_container: true,
            others: vec![Some("John Roe")],
            hotspot: Some(("L123456", "Mount Auburn Cemetery")),
            regions: vec![
                ("US-MA-017", "Middlesex"),
                ("US-MA", "Massachusetts"),
                ("US", "United States"),
            ],
            coordinates: "42.3709,-71.1445",
            entries: Some(vec![("Blue Jay", "3")]),
        }
    }
}

impl ChecklistPage {
    pub fn with_protocol(protocol: &'static str) -> Self {
        Self {
            protocol,
            ..Default::default()
        }
    }

    pub fn render(&self) -> String {
        let mut html = String::from("<!DOCTYPE html><html><head><title>Checklist</title></head><body>\n");

        if let Some(id) = self.identifier {
            let _ = writeln!(html, r#"<form><input type="hidden" name="subID" value="{id}"></form>"#);
        }
        let _ = writeln!(
            html,
            r#"<span class="Badge"><span class="Badge-label">{}</span></span>"#,
            self.status
        );
        if let Some(ts) = self.timestamp {
            let _ = writeln!(html, r#"<h2><time datetime="{ts}">{ts}</time></h2>"#);
        }

        html.push_str("<section class=\"location\">\n");
        if let Some((code, name)) = self.hotspot {
            let _ = writeln!(html, r#"<a href="/hotspot/{code}"><span>{name}</span></a>"#);
        }
        for (code, name) in &self.regions {
            let _ = writeln!(html, r#"<a href="/region/{code}"><span>{name}</span></a>"#);
        }
        let _ = writeln!(
            html,
            r#"<a class="u-inset-squish-sm" href="https://www.google.com/maps/search/?api=1&amp;query={}">Map</a>"#,
            self.coordinates
        );
        html.push_str("</section>\n");

        html.push_str("<section class=\"details\">\n");
        let _ = writeln!(
            html,
            r#"<h3><span class="Heading-main u-inline-sm">{}</span></h3>"#,
            self.protocol
        );
        if let Some(duration) = self.duration {
            let _ = writeln!(
                html,
                r#"<span title="Duration: {duration}"><span class="Badge-label">{duration}</span></span>"#
            );
        }
        if let Some(distance) = self.distance {
            let _ = writeln!(
                html,
                r#"<span title="Distance: {distance}"><span class="Badge-label">{distance}</span></span>"#
            );
        }
        if let Some(area) = self.area {
            let _ = writeln!(html, "<dl><dt>Area:</dt><dd>{area}</dd></dl>");
        }
        if let Some(size) = self.party_size {
            let _ = writeln!(html, "<div><span>Observers:</span> <span>{size}</span></div>");
        }
        if let Some(owner) = self.owner {
            let _ = writeln!(html, "<div><span>Owner</span> <span>{owner}</span></div>");
        }
        if self.others_container {
            html.push_str("<div id=\"checklist-others\">");
            for other in &self.others {
                match other {
                    Some(name) => {
                        let _ = write!(html, "<div><a href=\"/profile/x\"><span>{name}</span></a></div>");
                    }
                    None => html.push_str("<div>unknown</div>"),
                }
            }
            html.push_str("</div>\n");
        }
        html.push_str("</section>\n");

        if let Some(entries) = &self.entries {
            html.push_str("<div id=\"list\"><ol>\n");
            for (species, count) in entries {
                let _ = writeln!(
                    html,
                    r#"<li data-observation=""><div class="Observation-species"><a href="/species/x"><span>{species}</span></a></div><div class="Observation-numberObserved"><span class="is-visuallyHidden">Number observed:</span><span>{count}</span></div></li>"#
                );
            }
            html.push_str("</ol></div>\n");
        }

        html.push_str("</body></html>\n");
        html
    }
}
