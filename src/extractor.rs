use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::models::{FieldLabel, Listing};
use crate::parser;

// Zonaprop marks each listing card with data-posting-type and labels the
// card's fields with data-qa attributes.
const ADDRESS_SELECTOR: &str = "div.postingLocations-module__location-address.postingLocations-module__location-address-in-listing";
const FEATURE_SPAN_SELECTOR: &str = "span.postingMainFeatures-module__posting-main-features-span.postingMainFeatures-module__posting-main-features-listing";

/// Extracts every listing block on a results page, in document order.
pub fn extract_page(html: &str) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let block_selector = Selector::parse("div[data-posting-type]").unwrap();
    document.select(&block_selector).map(extract_listing).collect()
}

/// Reads the advertised listing total from the first level-one heading.
/// A page without a parsable total reads as zero, which ends pagination
/// immediately, so the fallback is reported instead of silently applied.
pub fn read_total_count(html: &str) -> u32 {
    let document = Html::parse_document(html);
    let heading_selector = Selector::parse("h1").unwrap();
    let Some(heading) = document.select(&heading_selector).next() else {
        warn!("no <h1> heading on results page, treating listing total as 0");
        return 0;
    };
    let text = heading.text().collect::<Vec<_>>().join(" ");
    match parser::parse_count(&text) {
        Some(count) => count,
        None => {
            warn!(heading = %text.trim(), "no listing total in heading, treating as 0");
            0
        }
    }
}

/// Pulls one flat record out of a single listing block. Missing optional
/// fields are simply absent; extraction itself never fails.
pub fn extract_listing(block: ElementRef) -> Listing {
    let mut listing = Listing {
        url: block.value().attr("data-to-posting").map(str::to_string),
        ..Listing::default()
    };

    let field_selector = Selector::parse("[data-qa]").unwrap();
    for element in block.select(&field_selector) {
        let label = element.value().attr("data-qa").unwrap_or_default();
        let text = element.text().collect::<String>();
        match FieldLabel::from_raw(label) {
            FieldLabel::Price => listing.price = Some(parser::parse_currency(&text)),
            FieldLabel::Expenses => listing.expenses = Some(parser::parse_currency(&text)),
            FieldLabel::Location => listing.location = Some(parser::normalize_text(&text)),
            FieldLabel::Description => listing.description = Some(parser::normalize_text(&text)),
            FieldLabel::Other(label) => {
                listing.extra.push((label, parser::normalize_text(&text)));
            }
        }
    }

    let address_selector = Selector::parse(ADDRESS_SELECTOR).unwrap();
    if let Some(element) = block.select(&address_selector).next() {
        let text = element.text().collect::<String>();
        listing.address = Some(parser::normalize_text(&text));
    }

    let feature_selector = Selector::parse(FEATURE_SPAN_SELECTOR).unwrap();
    let blurb = block
        .select(&feature_selector)
        .map(|span| span.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    if !blurb.is_empty() {
        listing.features = parser::parse_features(&blurb);
    }

    // The phone number only shows up inside embedded publisher JSON, so it
    // is scanned for in the serialized block rather than the element tree.
    listing.phone = parser::parse_phone(&block.html());

    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Currency, Feature};

    const PAGE: &str = r##"
    <html>
      <body>
        <h1>2 propiedades en venta en Palermo</h1>
        <div data-posting-type="PROPERTY" data-to-posting="/propiedades/depto-palermo-123.html">
          <div data-qa="POSTING_CARD_PRICE">330.000 USD</div>
          <div data-qa="expensas">$ 25.000 expensas</div>
          <div data-qa="POSTING_CARD_LOCATION">
            Palermo, Capital Federal
          </div>
          <div data-qa="POSTING_CARD_DESCRIPTION">	Luminoso departamento con balcón </div>
          <div data-qa="POSTING_CARD_PUBLISHER">Inmobiliaria Norte</div>
          <div class="postingLocations-module__location-address postingLocations-module__location-address-in-listing">Maure al 1700</div>
          <span class="postingMainFeatures-module__posting-main-features-span postingMainFeatures-module__posting-main-features-listing">215 m² tot.</span>
          <span class="postingMainFeatures-module__posting-main-features-span postingMainFeatures-module__posting-main-features-listing">5 amb.</span>
          <span class="postingMainFeatures-module__posting-main-features-span postingMainFeatures-module__posting-main-features-listing">2 baños</span>
          <script>{"publisher":{"publisherId":"9834","mainPhone":"1151020499"}}</script>
        </div>
        <div data-posting-type="DEVELOPMENT" data-to-posting="/propiedades/casa-nunez-456.html">
          <div data-qa="POSTING_CARD_PRICE">consultar</div>
        </div>
      </body>
    </html>
    "##;

    #[test]
    fn extract_page_returns_one_record_per_block_in_order() {
        let listings = extract_page(PAGE);
        assert_eq!(listings.len(), 2);
        assert_eq!(
            listings[0].url.as_deref(),
            Some("/propiedades/depto-palermo-123.html")
        );
        assert_eq!(
            listings[1].url.as_deref(),
            Some("/propiedades/casa-nunez-456.html")
        );
    }

    #[test]
    fn extract_listing_parses_price_and_expenses() {
        let listings = extract_page(PAGE);
        let price = listings[0].price.as_ref().unwrap();
        assert_eq!(price.amount, Amount::Parsed(330000));
        assert_eq!(price.currency, Some(Currency::Usd));

        let expenses = listings[0].expenses.as_ref().unwrap();
        assert_eq!(expenses.amount, Amount::Parsed(25000));
        assert_eq!(expenses.currency, Some(Currency::Sign));
    }

    #[test]
    fn extract_listing_normalizes_location_and_description() {
        let listings = extract_page(PAGE);
        assert_eq!(listings[0].location.as_deref(), Some("Palermo, Capital Federal"));
        assert_eq!(
            listings[0].description.as_deref(),
            Some("Luminoso departamento con balcón")
        );
    }

    #[test]
    fn extract_listing_finds_address_by_class_pair() {
        let listings = extract_page(PAGE);
        assert_eq!(listings[0].address.as_deref(), Some("Maure al 1700"));
        assert_eq!(listings[1].address, None);
    }

    #[test]
    fn extract_listing_joins_feature_spans_before_parsing() {
        let listings = extract_page(PAGE);
        let features = &listings[0].features;
        assert_eq!(features.get(&Feature::Area).map(String::as_str), Some("215"));
        assert_eq!(features.get(&Feature::Rooms).map(String::as_str), Some("5"));
        assert_eq!(features.get(&Feature::Bathrooms).map(String::as_str), Some("2"));
        assert!(listings[1].features.is_empty());
    }

    #[test]
    fn extract_listing_reads_phone_from_serialized_block() {
        let listings = extract_page(PAGE);
        assert_eq!(listings[0].phone.as_deref(), Some("1151020499"));
        assert_eq!(listings[1].phone, None);
    }

    #[test]
    fn extract_listing_passes_unknown_labels_through() {
        let listings = extract_page(PAGE);
        assert_eq!(
            listings[0].extra,
            vec![("POSTING_CARD_PUBLISHER".to_string(), "Inmobiliaria Norte".to_string())]
        );
    }

    #[test]
    fn extract_listing_degrades_unparsable_price() {
        let listings = extract_page(PAGE);
        let price = listings[1].price.as_ref().unwrap();
        assert_eq!(price.amount, Amount::Raw("consultar".to_string()));
        assert_eq!(price.currency, None);
    }

    #[test]
    fn read_total_count_from_heading() {
        assert_eq!(read_total_count(PAGE), 2);
    }

    #[test]
    fn read_total_count_with_separator() {
        let html = "<html><body><h1>1.250 resultados</h1></body></html>";
        assert_eq!(read_total_count(html), 1250);
    }

    #[test]
    fn read_total_count_defaults_to_zero() {
        let html = "<html><body><h1>Propiedades en venta</h1></body></html>";
        assert_eq!(read_total_count(html), 0);
        assert_eq!(read_total_count("<html><body></body></html>"), 0);
    }
}
