//! Single-order detail projection.
//!
//! This is the one place where optional upstream fields are replaced with
//! display defaults: strings become `""`, amounts become zero. Geocoordinates
//! and timestamps stay nullable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::age::days_since;
use crate::delivery::{DeliverySignal, detect_delivery};
use crate::notes::AliExpressReference;
use crate::order::{Address, Customer, DiscountCode, Fulfillment, LineItem, RawOrder, ShippingLine};
use crate::timeline::{Event, build_timeline};
use crate::tracking::{TrackedShipment, TrackingSet};
use crate::types::{
    CustomerId, FinancialStatus, FulfillmentId, FulfillmentStatus, LineItemId, OrderId,
};
use crate::urgency::{self, PrazoStatus, UrgencyLevel};

/// Everything the detail view shows for one order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: Option<OrderId>,
    pub name: String,
    pub order_number: Option<u64>,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub financial_status: Option<FinancialStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
    pub tags: Vec<String>,
    pub note: String,
    pub note_attributes: Vec<NoteAttributeView>,
    pub totals: Totals,
    pub customer: CustomerView,
    pub shipping_address: Option<AddressView>,
    pub billing_address: Option<AddressView>,
    pub line_items: Vec<LineItemView>,
    pub shipping_lines: Vec<ShippingLineView>,
    pub discount_codes: Vec<DiscountCodeView>,
    pub fulfillments: Vec<FulfillmentView>,
    pub tracking: Vec<TrackedShipment>,
    pub tracking_numbers: Vec<String>,
    pub has_tracking: bool,
    pub timeline: Vec<Event>,
    pub aliexpress: AliExpressReference,
    pub days_since_order: u32,
    pub is_delivered: bool,
    pub delivery_signal: Option<DeliverySignal>,
    pub urgency_level: UrgencyLevel,
    pub prazo_status: PrazoStatus,
    pub prazo_label: &'static str,
    pub is_late: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteAttributeView {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub currency: String,
    pub total_price: Decimal,
    pub subtotal_price: Decimal,
    pub total_tax: Decimal,
    pub total_discounts: Decimal,
    pub total_shipping: Decimal,
    pub total_refunded: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Orders placed by this customer, including this one.
    pub orders_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    pub name: String,
    pub company: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub province: String,
    pub province_code: String,
    pub zip: String,
    pub country: String,
    pub country_code: String,
    pub phone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub id: Option<LineItemId>,
    pub title: String,
    pub variant_title: String,
    pub sku: String,
    pub vendor: String,
    pub quantity: u32,
    pub price: Decimal,
    /// `price * quantity`, before line-level discounts. Saturates on overflow.
    pub total: Decimal,
    pub total_discount: Decimal,
    pub fulfillment_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLineView {
    pub title: String,
    pub code: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCodeView {
    pub code: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentView {
    pub id: Option<FulfillmentId>,
    pub status: String,
    pub shipment_status: String,
    pub tracking_company: String,
    pub tracking_numbers: Vec<String>,
    pub tracking_urls: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub item_count: u32,
}

impl OrderDetail {
    /// Project `order` into its detail view.
    ///
    /// `customer_orders_count` comes from the customer-history lookup (or its
    /// default when that lookup failed).
    #[must_use]
    pub fn project(order: &RawOrder, customer_orders_count: u64, now: DateTime<Utc>) -> Self {
        let created_at = order.created_at.or(order.updated_at).unwrap_or(now);
        let days_since_order = days_since(created_at, now);

        let delivery_signal = detect_delivery(order, days_since_order);
        let is_delivered = delivery_signal.is_some();
        let tracking = TrackingSet::from_order(order);
        let has_tracking = !tracking.is_empty();
        let urgency = urgency::classify(days_since_order, has_tracking, is_delivered);

        Self {
            id: order.id,
            name: text(order.name.as_ref()),
            order_number: order.order_number,
            email: text(order.email.as_ref()),
            phone: text(order.phone.as_ref()),
            created_at,
            updated_at: order.updated_at,
            processed_at: order.processed_at,
            cancelled_at: order.cancelled_at,
            financial_status: order.financial_status,
            fulfillment_status: order.fulfillment_status,
            tags: order.tag_list().into_iter().map(String::from).collect(),
            note: text(order.note.as_ref()),
            note_attributes: order
                .note_attributes
                .iter()
                .map(|attr| NoteAttributeView {
                    name: attr.name.clone(),
                    value: text(attr.value.as_ref()),
                })
                .collect(),
            totals: Totals {
                currency: text(order.currency.as_ref()),
                total_price: order.total_price.unwrap_or_default(),
                subtotal_price: order.subtotal_price.unwrap_or_default(),
                total_tax: order.total_tax.unwrap_or_default(),
                total_discounts: order.total_discounts.unwrap_or_default(),
                total_shipping: order.shipping_total(),
                total_refunded: order.refunded_amount().unwrap_or(Decimal::MAX),
            },
            customer: customer_view(order.customer.as_ref(), customer_orders_count),
            shipping_address: order.shipping_address.as_ref().map(address_view),
            billing_address: order.billing_address.as_ref().map(address_view),
            line_items: order.line_items.iter().map(line_item_view).collect(),
            shipping_lines: order.shipping_lines.iter().map(shipping_line_view).collect(),
            discount_codes: order.discount_codes.iter().map(discount_code_view).collect(),
            fulfillments: order.fulfillments.iter().map(fulfillment_view).collect(),
            tracking_numbers: tracking.numbers(),
            tracking: tracking.into_shipments(),
            has_tracking,
            timeline: build_timeline(order, created_at),
            aliexpress: AliExpressReference::from_order(order),
            days_since_order,
            is_delivered,
            delivery_signal,
            urgency_level: urgency.urgency_level,
            prazo_status: urgency.prazo_status,
            prazo_label: urgency.prazo_status.label(),
            is_late: urgency::is_late(days_since_order, has_tracking),
        }
    }
}

fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn customer_view(customer: Option<&Customer>, orders_count: u64) -> CustomerView {
    let Some(customer) = customer else {
        return CustomerView {
            orders_count,
            ..CustomerView::default()
        };
    };

    let name = [customer.first_name.as_deref(), customer.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    CustomerView {
        id: customer.id,
        name,
        email: text(customer.email.as_ref()),
        phone: text(customer.phone.as_ref()),
        orders_count,
    }
}

fn address_view(address: &Address) -> AddressView {
    let name = address.name.clone().unwrap_or_else(|| {
        [address.first_name.as_deref(), address.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    });

    AddressView {
        name,
        company: text(address.company.as_ref()),
        address1: text(address.address1.as_ref()),
        address2: text(address.address2.as_ref()),
        city: text(address.city.as_ref()),
        province: text(address.province.as_ref()),
        province_code: text(address.province_code.as_ref()),
        zip: text(address.zip.as_ref()),
        country: text(address.country.as_ref()),
        country_code: text(address.country_code.as_ref()),
        phone: text(address.phone.as_ref()),
        latitude: address.latitude,
        longitude: address.longitude,
    }
}

fn line_item_view(item: &LineItem) -> LineItemView {
    let price = item.price.unwrap_or_default();
    LineItemView {
        id: item.id,
        title: item
            .title
            .clone()
            .or_else(|| item.name.clone())
            .unwrap_or_default(),
        variant_title: text(item.variant_title.as_ref()),
        sku: text(item.sku.as_ref()),
        vendor: text(item.vendor.as_ref()),
        quantity: item.quantity,
        price,
        total: price.saturating_mul(Decimal::from(item.quantity)),
        total_discount: item.total_discount.unwrap_or_default(),
        fulfillment_status: text(item.fulfillment_status.as_ref()),
    }
}

fn shipping_line_view(line: &ShippingLine) -> ShippingLineView {
    ShippingLineView {
        title: text(line.title.as_ref()),
        code: text(line.code.as_ref()),
        price: line.price.unwrap_or_default(),
    }
}

fn discount_code_view(discount: &DiscountCode) -> DiscountCodeView {
    DiscountCodeView {
        code: text(discount.code.as_ref()),
        amount: discount.amount.unwrap_or_default(),
        kind: text(discount.kind.as_ref()),
    }
}

fn fulfillment_view(fulfillment: &Fulfillment) -> FulfillmentView {
    let mut tracking_numbers: Vec<String> = fulfillment.tracking_number.iter().cloned().collect();
    for number in &fulfillment.tracking_numbers {
        if !tracking_numbers.contains(number) {
            tracking_numbers.push(number.clone());
        }
    }

    let tracking_urls = if fulfillment.tracking_urls.is_empty() {
        fulfillment.tracking_url.iter().cloned().collect()
    } else {
        fulfillment.tracking_urls.clone()
    };

    FulfillmentView {
        id: fulfillment.id,
        status: text(fulfillment.status.as_ref()),
        shipment_status: text(fulfillment.shipment_status.as_ref()),
        tracking_company: text(fulfillment.tracking_company.as_ref()),
        tracking_numbers,
        tracking_urls,
        created_at: fulfillment.created_at,
        updated_at: fulfillment.updated_at,
        item_count: fulfillment.line_items.iter().map(|item| item.quantity).sum(),
    }
}
