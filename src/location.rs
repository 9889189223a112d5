//! Location extraction.
//!
//! The page links the site as a hotspot and then the county, state and country
//! as region links, always in that order. The hierarchy is only read when
//! exactly three region links are present.

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use crate::document::{self, pattern, selector};
use crate::error::{ChecklistError, Result};
use crate::record::{Location, Region};

static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static MAP_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.u-inset-squish-sm"));
static HOTSPOT_HREF: LazyLock<Regex> = LazyLock::new(|| pattern("hotspot"));
static REGION_HREF: LazyLock<Regex> = LazyLock::new(|| pattern("region"));

/// Region links in page order: subnational2, subnational1, country.
const REGION_LEVELS: usize = 3;

/// Last path segment of a link, e.g. `US-MA` from `/region/US-MA?yr=all`.
fn link_code(link: ElementRef<'_>, element: &str) -> Result<String> {
    document::attr(link, "href")
        .and_then(|href| href.split(['?', '#']).next())
        .and_then(|path| path.trim_end_matches('/').rsplit('/').next())
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ChecklistError::malformed(element.to_string(), "link has no code"))
}

/// Label of a link, preferring its inner span.
fn link_label(link: ElementRef<'_>) -> String {
    document::find(link, &SPAN)
        .map(document::text)
        .unwrap_or_else(|| document::text(link))
}

fn scrape_region(link: ElementRef<'_>) -> Result<Region> {
    Ok(Region {
        name: link_label(link),
        code: link_code(link, "region link")?,
    })
}

/// Latitude and longitude from the map link's `...&query=<lat>,<lon>` href.
pub fn scrape_coordinates(node: ElementRef<'_>) -> Result<(f64, f64)> {
    let href = document::find(node, &MAP_LINK)
        .and_then(|link| document::attr(link, "href"))
        .ok_or_else(|| ChecklistError::malformed("a.u-inset-squish-sm", "map link"))?;

    let value = href.split('=').nth(2).ok_or_else(|| {
        ChecklistError::malformed("a.u-inset-squish-sm", format!("no coordinates in '{href}'"))
    })?;

    let parse = |part: Option<&str>| {
        part.and_then(|p| p.trim().parse::<f64>().ok()).ok_or_else(|| {
            ChecklistError::malformed("a.u-inset-squish-sm", format!("bad coordinates '{value}'"))
        })
    };
    let mut parts = value.split(',');
    let latitude = parse(parts.next())?;
    let longitude = parse(parts.next())?;
    Ok((latitude, longitude))
}

pub fn scrape_location(node: ElementRef<'_>) -> Result<Location> {
    let hotspot = document::find_by_attr(node, &LINK, "href", &HOTSPOT_HREF)
        .ok_or_else(|| ChecklistError::malformed("a[href*=hotspot]", "location"))?;

    let regions = document::find_all_by_attr(node, &LINK, "href", &REGION_HREF);
    let [subnational2, subnational1, country] = regions.as_slice() else {
        return Err(ChecklistError::malformed(
            "a[href*=region]",
            format!("expected {REGION_LEVELS} region links, found {}", regions.len()),
        ));
    };

    let (latitude, longitude) = scrape_coordinates(node)?;

    Ok(Location {
        name: link_label(hotspot),
        identifier: link_code(hotspot, "hotspot link")?,
        subnational2: scrape_region(*subnational2)?,
        subnational1: scrape_region(*subnational1)?,
        country: scrape_region(*country)?,
        latitude,
        longitude,
    })
}
