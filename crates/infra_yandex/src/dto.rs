//! Wire formats
//!
//! Request bodies are built from the domain types with `From` impls; response
//! bodies are read leniently because the provider omits fields freely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::{Coordinates, Money};
use domain_claims::{ClaimItem, ClaimRequest, ClaimRoutePoint, Contact};
use domain_quote::{PricingItem, PricingRequest, RoutePoint};

// ============================================================================
// Shared
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeDto {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

fn lon_lat(coordinates: &Coordinates) -> [f64; 2] {
    coordinates.as_pair()
}

// ============================================================================
// offers/calculate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculateRequestDto {
    pub route_points: Vec<RoutePointDto>,
    pub items: Vec<PricingItemDto>,
    pub requirements: RequirementsDto,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePointDto {
    pub id: u8,
    pub coordinates: [f64; 2],
    pub fullname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingItemDto {
    pub quantity: u32,
    pub weight: f64,
    pub size: SizeDto,
    pub pickup_point: u8,
    pub dropoff_point: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementsDto {
    pub taxi_classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo_type: Option<&'static str>,
    pub cargo_loaders: u32,
    pub skip_door_to_door: bool,
}

impl From<&RoutePoint> for RoutePointDto {
    fn from(point: &RoutePoint) -> Self {
        Self {
            id: point.id,
            coordinates: lon_lat(&point.coordinates),
            fullname: point.fullname.clone(),
        }
    }
}

impl From<&PricingItem> for PricingItemDto {
    fn from(item: &PricingItem) -> Self {
        Self {
            quantity: item.quantity,
            weight: item.weight_kg,
            size: SizeDto {
                length: item.length_m,
                width: item.width_m,
                height: item.height_m,
            },
            pickup_point: item.pickup_point,
            dropoff_point: item.dropoff_point,
        }
    }
}

impl From<&PricingRequest> for CalculateRequestDto {
    fn from(request: &PricingRequest) -> Self {
        Self {
            route_points: request.route_points.iter().map(RoutePointDto::from).collect(),
            items: request.items.iter().map(PricingItemDto::from).collect(),
            requirements: RequirementsDto {
                taxi_classes: request.requirements.taxi_classes.clone(),
                cargo_type: request.requirements.cargo_type.map(|class| class.api_name()),
                cargo_loaders: request.requirements.cargo_loaders,
                skip_door_to_door: request.requirements.skip_door_to_door,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateResponseDto {
    #[serde(default)]
    pub offers: Vec<OfferDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferDto {
    #[serde(default)]
    pub price: Option<OfferPriceDto>,
    #[serde(default)]
    pub offer: Option<OfferTokenDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferPriceDto {
    /// String or number depending on the endpoint version
    #[serde(default)]
    pub total_price: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferTokenDto {
    #[serde(default)]
    pub payload: Option<String>,
}

impl OfferDto {
    /// Total price as money, `None` when missing, not numeric or in an
    /// unknown currency
    ///
    /// `default_currency` applies only when the offer names no currency.
    pub fn total_price(&self, default_currency: core_kernel::Currency) -> Option<Money> {
        let price = self.price.as_ref()?;
        let currency = match price.currency.as_deref() {
            Some(code) => code.parse().ok()?,
            None => default_currency,
        };
        let raw = price.total_price.as_ref()?;
        let text = match raw {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            _ => return None,
        };
        Money::parse(&text, currency).ok()
    }

    pub fn payload(&self) -> Option<&str> {
        self.offer
            .as_ref()
            .and_then(|offer| offer.payload.as_deref())
            .filter(|payload| !payload.is_empty())
    }
}

// ============================================================================
// claims/create and claims/accept
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateClaimDto {
    pub request_id: String,
    pub items: Vec<ClaimItemDto>,
    pub route_points: Vec<ClaimRoutePointDto>,
    pub client_requirements: ClientRequirementsDto,
    pub skip_client_notify: bool,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_payload: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimItemDto {
    pub extra_id: String,
    pub pickup_point: u8,
    pub dropoff_point: u8,
    pub title: String,
    pub size: SizeDto,
    pub weight: f64,
    /// Decimal string with two places
    pub cost_value: String,
    pub cost_currency: String,
    pub quantity: u32,
    pub age_restricted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimRoutePointDto {
    pub point_id: u8,
    pub visit_order: u8,
    #[serde(rename = "type")]
    pub point_type: &'static str,
    pub contact: ContactDto,
    pub address: AddressDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_order_id: Option<String>,
    pub skip_confirmation: bool,
    pub leave_under_door: bool,
    pub meet_outside: bool,
    pub no_door_call: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactDto {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressDto {
    pub fullname: String,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRequirementsDto {
    pub taxi_class: String,
    pub cargo_type: &'static str,
    pub cargo_loaders: u32,
}

impl From<&ClaimItem> for ClaimItemDto {
    fn from(item: &ClaimItem) -> Self {
        Self {
            extra_id: item.extra_id.clone(),
            pickup_point: item.pickup_point,
            dropoff_point: item.dropoff_point,
            title: item.title.clone(),
            size: SizeDto {
                length: item.length_m,
                width: item.width_m,
                height: item.height_m,
            },
            weight: item.weight_kg,
            cost_value: item.cost_value.to_plain_string(),
            cost_currency: item.cost_value.currency().code().to_string(),
            quantity: item.quantity,
            age_restricted: item.age_restricted,
        }
    }
}

impl From<&Contact> for ContactDto {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
        }
    }
}

impl From<&ClaimRoutePoint> for ClaimRoutePointDto {
    fn from(point: &ClaimRoutePoint) -> Self {
        Self {
            point_id: point.point_id,
            visit_order: point.visit_order,
            point_type: point.point_type.as_str(),
            contact: ContactDto::from(&point.contact),
            address: AddressDto {
                fullname: point.fullname.clone(),
                coordinates: lon_lat(&point.coordinates),
            },
            external_order_id: point.external_order_id.clone(),
            skip_confirmation: point.skip_confirmation,
            leave_under_door: point.leave_under_door,
            meet_outside: point.meet_outside,
            no_door_call: point.no_door_call,
        }
    }
}

impl CreateClaimDto {
    /// Fails only when the offer payload is not valid UTF-8
    pub fn try_from_request(request: &ClaimRequest) -> Result<Self, std::str::Utf8Error> {
        let offer_payload = request
            .offer_payload
            .as_ref()
            .map(|payload| std::str::from_utf8(payload.as_bytes()).map(str::to_string))
            .transpose()?;

        Ok(Self {
            request_id: request.request_id.to_string(),
            items: request.items.iter().map(ClaimItemDto::from).collect(),
            route_points: request.route_points.iter().map(ClaimRoutePointDto::from).collect(),
            client_requirements: ClientRequirementsDto {
                taxi_class: request.client_requirements.taxi_class.clone(),
                cargo_type: request.client_requirements.cargo_type.api_name(),
                cargo_loaders: request.client_requirements.cargo_loaders,
            },
            skip_client_notify: request.skip_client_notify,
            comment: request.comment.clone(),
            offer_payload,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClaimResponseDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptClaimDto {
    pub claim_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcceptClaimResponseDto {
    #[serde(default)]
    pub status: Option<String>,
}

// ============================================================================
// Geocoder 1.x
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocoderEnvelopeDto {
    #[serde(default)]
    pub response: Option<GeocoderResponseDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocoderResponseDto {
    #[serde(rename = "GeoObjectCollection", default)]
    pub collection: Option<GeoObjectCollectionDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoObjectCollectionDto {
    #[serde(rename = "metaDataProperty", default)]
    pub meta: Option<CollectionMetaDto>,
    #[serde(rename = "featureMember", default)]
    pub members: Vec<FeatureMemberDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionMetaDto {
    #[serde(rename = "GeocoderResponseMetaData", default)]
    pub response_meta: Option<GeocoderResponseMetaDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocoderResponseMetaDto {
    /// Sent as a string by the service
    #[serde(default)]
    pub found: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureMemberDto {
    #[serde(rename = "GeoObject", default)]
    pub geo_object: Option<GeoObjectDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoObjectDto {
    #[serde(rename = "Point", default)]
    pub point: Option<PointDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointDto {
    #[serde(default)]
    pub pos: Option<String>,
}

impl GeocoderEnvelopeDto {
    fn collection(&self) -> Option<&GeoObjectCollectionDto> {
        self.response.as_ref()?.collection.as_ref()
    }

    /// Match count, zero when absent or unparseable
    pub fn found(&self) -> u64 {
        let raw = self
            .collection()
            .and_then(|collection| collection.meta.as_ref())
            .and_then(|meta| meta.response_meta.as_ref())
            .and_then(|response_meta| response_meta.found.as_ref());
        match raw {
            Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
            Some(Value::Number(number)) => number.as_u64().unwrap_or(0),
            _ => 0,
        }
    }

    /// `"lon lat"` of the first feature member
    pub fn first_pos(&self) -> Option<&str> {
        self.collection()?
            .members
            .first()?
            .geo_object
            .as_ref()?
            .point
            .as_ref()?
            .pos
            .as_deref()
    }
}
