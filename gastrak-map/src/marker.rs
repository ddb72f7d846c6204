//! Station labels: name with a navigation link, and a clickable price.

use std::{
    fmt::{Display, Formatter},
    rc::Rc,
};

use async_trait::async_trait;
use gastrak_quantities::Dollars;

use crate::{
    feed::StationSnapshot,
    geo::Coordinates,
    grade::Grade,
    history::HistoryQuery,
    navigation::{NavigationLink, Platform},
    prelude::*,
    surface::Point,
};

pub const PRICE_PLACEHOLDER: &str = "N/A";

/// Capability to open the history panel, handed to the marker builder.
#[async_trait(?Send)]
pub trait HistoryRequester {
    async fn request(&self, query: HistoryQuery);
}

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PriceText {
    Known(Dollars),
    Unknown,
}

impl From<Option<Dollars>> for PriceText {
    fn from(price: Option<Dollars>) -> Self {
        price.map_or(Self::Unknown, Self::Known)
    }
}

impl Display for PriceText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(price) => Display::fmt(price, f),
            Self::Unknown => f.write_str(PRICE_PLACEHOLDER),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TooltipOptions {
    pub direction: Direction,
    pub permanent: bool,
    pub offset: Point,
    pub opacity: f64,
    pub interactive: bool,
}

impl TooltipOptions {
    /// Always visible above the pin, clear of the marker icon.
    pub const STATION_LABEL: Self = Self {
        direction: Direction::Top,
        permanent: true,
        offset: Point::new(0.0, -16.0),
        opacity: 1.0,
        interactive: true,
    };
}

/// The clickable price. Activation goes straight to the injected requester.
#[must_use]
#[derive(Clone, derive_more::Debug)]
pub struct PriceAction {
    query: HistoryQuery,

    #[debug(skip)]
    requester: Rc<dyn HistoryRequester>,
}

impl PriceAction {
    pub const fn query(&self) -> &HistoryQuery {
        &self.query
    }

    #[instrument(skip_all, fields(station = %self.query.station_name, grade = %self.query.grade))]
    pub async fn activate(&self) {
        debug!("activated");
        self.requester.request(self.query.clone()).await;
    }
}

#[must_use]
#[derive(Clone, Debug)]
pub struct InteractiveLabel {
    pub anchor: Coordinates,
    pub name: String,
    pub link: NavigationLink,
    pub price: PriceText,
    pub action: PriceAction,
    pub options: TooltipOptions,
}

impl InteractiveLabel {
    /// Markup for HTML hosts: linked bold name, line break, clickable price.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            r#"<a href="{}"><b>{}</b></a><br><span class="price" role="button">{}</span>"#,
            escape_html(self.link.as_str()),
            escape_html(&self.name),
            escape_html(&self.price.to_string()),
        )
    }
}

pub struct MarkerViewBuilder {
    requester: Rc<dyn HistoryRequester>,
    platform: Platform,
    grade: Grade,
}

impl MarkerViewBuilder {
    pub fn new(requester: Rc<dyn HistoryRequester>, platform: Platform) -> Self {
        Self { requester, platform, grade: Grade::default() }
    }

    /// Grade requested when a price is activated.
    #[must_use]
    pub const fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = grade;
        self
    }

    pub fn build(&self, station: &StationSnapshot) -> InteractiveLabel {
        let anchor = station.coordinates();
        InteractiveLabel {
            anchor,
            name: station.name.clone(),
            link: NavigationLink::resolve(anchor, self.platform),
            price: station.current_price.into(),
            action: PriceAction {
                query: HistoryQuery::new(station.name.clone(), self.grade),
                requester: Rc::clone(&self.requester),
            },
            options: TooltipOptions::STATION_LABEL,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for char_ in text.chars() {
        match char_ {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(char_),
        }
    }
    escaped
}
