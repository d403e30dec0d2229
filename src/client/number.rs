use reqwest::Method;
use tracing::{debug, instrument};

use super::{VivialClient, VivialError};
use crate::domain::{
    AreaCode, BuyLocalNumber, BuyNumber, Number, NumberId, NumberInfo, PhoneNumber, QueryParams,
    ValidationError,
};
use crate::transport::{
    decode_number_info_response, decode_number_response, decode_numbers_response,
    encode_buy_available_number_body, encode_buy_local_number_body, encode_buy_number_body,
    encode_update_number_body,
};

const RESOURCE: &str = "numbers";
const LOCAL: &str = "local";
const AVAILABLE_US_LOCAL: &str = "available/US/local";

fn required_id(number: &Number) -> Result<NumberId, ValidationError> {
    number.id.ok_or(ValidationError::Missing {
        field: NumberId::FIELD,
    })
}

impl VivialClient {
    /// List numbers associated with the account (local and toll-free).
    #[instrument(skip(self, query), fields(account_id = %self.account_id))]
    pub async fn get_associated_numbers(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<Number>, VivialError> {
        let url = self.resource_url(RESOURCE, None)?;
        self.get(url, query)
            .await?
            .decode(decode_numbers_response)
    }

    /// List local numbers associated with the account.
    #[instrument(skip(self, query), fields(account_id = %self.account_id))]
    pub async fn get_local_associated_numbers(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<Number>, VivialError> {
        let url = self.resource_url(RESOURCE, Some(LOCAL))?;
        self.get(url, query)
            .await?
            .decode(decode_numbers_response)
    }

    /// Search available US local numbers in a region (two-letter state code).
    #[instrument(skip(self, query), fields(account_id = %self.account_id))]
    pub async fn find_available_numbers_in_region(
        &self,
        region: &str,
        query: &QueryParams,
    ) -> Result<Vec<Number>, VivialError> {
        self.find_available_numbers(query.clone().with("in_region", region))
            .await
    }

    /// Search available US local numbers in an area code.
    #[instrument(
        skip(self, query),
        fields(account_id = %self.account_id, area_code = area_code.as_str())
    )]
    pub async fn find_available_numbers_by_area_code(
        &self,
        area_code: &AreaCode,
        query: &QueryParams,
    ) -> Result<Vec<Number>, VivialError> {
        self.find_available_numbers(query.clone().with(AreaCode::FIELD, area_code.as_str()))
            .await
    }

    /// Search available US local numbers around a postal code.
    #[instrument(skip(self, query), fields(account_id = %self.account_id))]
    pub async fn find_available_numbers_by_postal_code(
        &self,
        postal_code: &str,
        query: &QueryParams,
    ) -> Result<Vec<Number>, VivialError> {
        self.find_available_numbers(query.clone().with("in_postal_code", postal_code))
            .await
    }

    async fn find_available_numbers(&self, query: QueryParams) -> Result<Vec<Number>, VivialError> {
        let url = self.resource_url(RESOURCE, Some(AVAILABLE_US_LOCAL))?;
        let numbers = self
            .get(url, &query)
            .await?
            .decode(decode_numbers_response)?;
        debug!(found = numbers.len(), "available numbers");
        Ok(numbers)
    }

    /// Total number of associated numbers.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn number_count(&self) -> Result<u64, VivialError> {
        self.count(self.resource_url(RESOURCE, Some("count"))?)
            .await
    }

    /// Total number of associated local numbers.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn local_number_count(&self) -> Result<u64, VivialError> {
        self.count(self.resource_url(RESOURCE, Some("local/count"))?)
            .await
    }

    /// Fetch one associated number by id.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn get_number_by_id(&self, id: NumberId) -> Result<Number, VivialError> {
        let url = self.resource_url(RESOURCE, Some(&id.to_string()))?;
        self.get(url, &QueryParams::new())
            .await?
            .decode(decode_number_response)
    }

    /// Fetch one associated local number by id.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn get_local_number_by_id(&self, id: NumberId) -> Result<Number, VivialError> {
        let url = self.resource_url(RESOURCE, Some(&format!("{LOCAL}/{id}")))?;
        self.get(url, &QueryParams::new())
            .await?
            .decode(decode_number_response)
    }

    /// Buy a number, either an exact phone number or any number in an area code.
    #[instrument(skip(self, request), fields(account_id = %self.account_id))]
    pub async fn buy_number(&self, request: &BuyNumber) -> Result<Number, VivialError> {
        let url = self.resource_url(RESOURCE, None)?;
        let number = self
            .send_json(Method::POST, url, encode_buy_number_body(request))
            .await?
            .decode(decode_number_response)?;
        debug!(number_id = ?number.id, "number purchased");
        Ok(number)
    }

    /// Buy a local number.
    #[instrument(skip(self, request), fields(account_id = %self.account_id))]
    pub async fn buy_local_number(&self, request: &BuyLocalNumber) -> Result<Number, VivialError> {
        let url = self.resource_url(RESOURCE, Some(LOCAL))?;
        let number = self
            .send_json(Method::POST, url, encode_buy_local_number_body(request))
            .await?
            .decode(decode_number_response)?;
        debug!(number_id = ?number.id, "local number purchased");
        Ok(number)
    }

    /// Buy a number returned by one of the `find_available_numbers_*` searches.
    ///
    /// Errors:
    /// - Returns [`VivialError::Validation`] when `phone_number` or
    ///   `phone_number_type` is missing.
    #[instrument(skip(self, available), fields(account_id = %self.account_id))]
    pub async fn buy_available_number(&self, available: &Number) -> Result<Number, VivialError> {
        let body = encode_buy_available_number_body(available)?;
        let url = self.resource_url(RESOURCE, None)?;
        self.send_json(Method::POST, url, body)
            .await?
            .decode(decode_number_response)
    }

    /// Save the writable settings of an associated number and copy the result back.
    #[instrument(skip(self, number), fields(account_id = %self.account_id, number_id = ?number.id))]
    pub async fn update_number(&self, number: &mut Number) -> Result<(), VivialError> {
        let id = required_id(number)?;
        let url = self.resource_url(RESOURCE, Some(&id.to_string()))?;
        self.put_number(url, id, number).await
    }

    /// Like [`VivialClient::update_number`], through the local-number endpoint.
    ///
    /// Errors:
    /// - Returns [`VivialError::Validation`] if the number is not local.
    #[instrument(skip(self, number), fields(account_id = %self.account_id, number_id = ?number.id))]
    pub async fn update_local_number(&self, number: &mut Number) -> Result<(), VivialError> {
        number.ensure_local()?;
        let id = required_id(number)?;
        let url = self.resource_url(RESOURCE, Some(&format!("{LOCAL}/{id}")))?;
        self.put_number(url, id, number).await
    }

    async fn put_number(
        &self,
        url: url::Url,
        id: NumberId,
        number: &mut Number,
    ) -> Result<(), VivialError> {
        let returned = self
            .send_json(Method::PUT, url, encode_update_number_body(id, number))
            .await?
            .decode(decode_number_response)?;
        number.update_from(returned);
        Ok(())
    }

    /// Release an associated number. Returns `true` when the server answers
    /// `204 No Content`.
    #[instrument(skip(self, number), fields(account_id = %self.account_id, number_id = ?number.id))]
    pub async fn delete_number(&self, number: &Number) -> Result<bool, VivialError> {
        let id = required_id(number)?;
        self.delete(self.resource_url(RESOURCE, Some(&id.to_string()))?)
            .await
    }

    /// Release an associated local number.
    ///
    /// Errors:
    /// - Returns [`VivialError::Validation`] if the number is not local.
    #[instrument(skip(self, number), fields(account_id = %self.account_id, number_id = ?number.id))]
    pub async fn delete_local_number(&self, number: &Number) -> Result<bool, VivialError> {
        number.ensure_local()?;
        let id = required_id(number)?;
        self.delete(self.resource_url(RESOURCE, Some(&format!("{LOCAL}/{id}")))?)
            .await
    }

    /// Look up carrier and device details for a number.
    #[instrument(skip(self, number), fields(account_id = %self.account_id))]
    pub async fn lookup_number(&self, number: &Number) -> Result<NumberInfo, VivialError> {
        let raw = number.phone_number.as_deref().ok_or(ValidationError::Missing {
            field: PhoneNumber::FIELD,
        })?;
        let phone_number = PhoneNumber::parse(None, raw)?;
        let url = self.resource_url(RESOURCE, Some("lookup"))?;
        let query = QueryParams::new().with(PhoneNumber::FIELD, phone_number.digits());
        self.get(url, &query)
            .await?
            .decode(decode_number_info_response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::fake::{FakeTransport, make_client};
    use crate::domain::{CallbackMethod, NumberOptions, PhoneNumberType};

    const NUMBER_JSON: &str = r#"
    {
      "phone_number": {
        "id": 31,
        "account_id": 10096,
        "name": "(202) 555-0123",
        "phone_number": "+12025550123",
        "phone_number_type": "local",
        "incoming_text_url": "https://example.com/in",
        "incoming_text_method": "POST",
        "capabilities": {"sms": true, "mms": true, "voice": false},
        "city": "Washington",
        "region": "DC",
        "active": true
      }
    }
    "#;

    fn local_number() -> Number {
        Number {
            id: Some(NumberId::new(31).unwrap()),
            phone_number: Some("+12025550123".to_owned()),
            phone_number_type: Some(PhoneNumberType::Local),
            ..Default::default()
        }
    }

    fn toll_free_number() -> Number {
        Number {
            id: Some(NumberId::new(32).unwrap()),
            phone_number: Some("+18005550100".to_owned()),
            phone_number_type: Some(PhoneNumberType::TollFree),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_associated_numbers() {
        let json = r#"{"phone_numbers": [{"id": 31, "phone_number": "+12025550123"}, {"id": 32}]}"#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone());

        let numbers = client
            .get_associated_numbers(&QueryParams::new())
            .await
            .unwrap();
        assert_eq!(numbers.len(), 2);
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/numbers.json"
        );

        let numbers = client
            .get_local_associated_numbers(&QueryParams::new().limit(5))
            .await
            .unwrap();
        assert_eq!(numbers.len(), 2);
        let request = transport.last_request();
        assert_eq!(request.path(), "/api/v1.0/accounts/10096/numbers/local.json");
        assert_eq!(request.url.query(), Some("limit=5"));
    }

    #[tokio::test]
    async fn find_available_numbers_add_search_filter() {
        let json = r#"{"phone_numbers": [{"phone_number": "+12025550111", "phone_number_type": "local", "city": "Washington"}]}"#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone());
        let path = "/api/v1.0/accounts/10096/numbers/available/US/local.json";

        let found = client
            .find_available_numbers_in_region("DC", &QueryParams::new().limit(1))
            .await
            .unwrap();
        assert_eq!(found[0].city.as_deref(), Some("Washington"));
        assert!(found[0].id.is_none());
        let request = transport.last_request();
        assert_eq!(request.path(), path);
        assert_eq!(request.url.query(), Some("in_region=DC&limit=1"));

        client
            .find_available_numbers_by_area_code(
                &AreaCode::new("202").unwrap(),
                &QueryParams::new(),
            )
            .await
            .unwrap();
        assert_eq!(transport.last_request().url.query(), Some("area_code=202"));

        client
            .find_available_numbers_by_postal_code("20001", &QueryParams::new())
            .await
            .unwrap();
        let request = transport.last_request();
        assert_eq!(request.path(), path);
        assert_eq!(request.url.query(), Some("in_postal_code=20001"));
    }

    #[tokio::test]
    async fn counts_use_count_endpoints() {
        let transport = FakeTransport::new(200, r#"{"count": 7}"#);
        let client = make_client(transport.clone());

        assert_eq!(client.number_count().await.unwrap(), 7);
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/numbers/count.json"
        );
        assert_eq!(client.local_number_count().await.unwrap(), 7);
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/numbers/local/count.json"
        );
    }

    #[tokio::test]
    async fn get_number_by_id_fetches_single_resource() {
        let transport = FakeTransport::new(200, NUMBER_JSON);
        let client = make_client(transport.clone());

        let number = client
            .get_number_by_id(NumberId::new(31).unwrap())
            .await
            .unwrap();
        assert_eq!(number.phone_number.as_deref(), Some("+12025550123"));
        assert!(number.is_local());
        assert!(number.capabilities.is_some_and(|it| it.mms && !it.voice));
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/numbers/31.json"
        );

        client
            .get_local_number_by_id(NumberId::new(31).unwrap())
            .await
            .unwrap();
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/numbers/local/31.json"
        );
    }

    #[tokio::test]
    async fn buy_number_by_area_code_and_local_by_number() {
        let transport = FakeTransport::new(200, NUMBER_JSON);
        let client = make_client(transport.clone());

        let request = BuyNumber::area_code(
            AreaCode::new("202").unwrap(),
            Some(PhoneNumberType::Local),
            NumberOptions {
                name: Some("support".to_owned()),
                ..Default::default()
            },
        );
        let number = client.buy_number(&request).await.unwrap();
        assert_eq!(number.id, Some(NumberId::new(31).unwrap()));
        let sent = transport.last_request();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.path(), "/api/v1.0/accounts/10096/numbers.json");
        assert_eq!(
            sent.json_body(),
            json!({
                "phone_number": {
                    "area_code": "202",
                    "phone_number_type": "local",
                    "name": "support"
                }
            })
        );

        let request = BuyLocalNumber::phone_number(
            PhoneNumber::parse(None, "+12025550123").unwrap(),
            NumberOptions::default(),
        );
        client.buy_local_number(&request).await.unwrap();
        let sent = transport.last_request();
        assert_eq!(sent.path(), "/api/v1.0/accounts/10096/numbers/local.json");
        assert_eq!(
            sent.json_body(),
            json!({"phone_number": {"phone_number": "+12025550123"}})
        );
    }

    #[tokio::test]
    async fn buy_available_number_requires_type() {
        let transport = FakeTransport::new(200, NUMBER_JSON);
        let client = make_client(transport.clone());

        let mut available = Number {
            phone_number: Some("+12025550123".to_owned()),
            ..Default::default()
        };
        let err = client.buy_available_number(&available).await.unwrap_err();
        assert!(matches!(
            err,
            VivialError::Validation(ValidationError::Missing {
                field: "phone_number_type"
            })
        ));
        assert_eq!(transport.request_count(), 0);

        available.phone_number_type = Some(PhoneNumberType::Local);
        client.buy_available_number(&available).await.unwrap();
        assert_eq!(
            transport.last_request().json_body(),
            json!({"phone_number": {"phone_number": "+12025550123", "phone_number_type": "local"}})
        );
    }

    #[tokio::test]
    async fn update_number_puts_writable_fields_and_copies_back() {
        let transport = FakeTransport::new(200, NUMBER_JSON);
        let client = make_client(transport.clone());

        let mut number = local_number();
        number.incoming_text_url = Some("https://example.com/in".to_owned());
        number.incoming_text_method = Some(CallbackMethod::Post);
        client.update_number(&mut number).await.unwrap();

        assert_eq!(number.city.as_deref(), Some("Washington"));
        assert!(number.active);
        let request = transport.last_request();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path(), "/api/v1.0/accounts/10096/numbers/31.json");
        assert_eq!(
            request.json_body(),
            json!({
                "phone_number": {
                    "id": 31,
                    "incoming_text_url": "https://example.com/in",
                    "incoming_text_method": "POST"
                }
            })
        );

        client.update_local_number(&mut number).await.unwrap();
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/numbers/local/31.json"
        );
    }

    #[tokio::test]
    async fn local_operations_reject_toll_free_numbers() {
        let transport = FakeTransport::new(204, "");
        let client = make_client(transport.clone());

        let mut number = toll_free_number();
        let err = client.update_local_number(&mut number).await.unwrap_err();
        assert!(matches!(
            err,
            VivialError::Validation(ValidationError::NotLocalNumber { .. })
        ));
        let err = client.delete_local_number(&number).await.unwrap_err();
        assert!(matches!(
            err,
            VivialError::Validation(ValidationError::NotLocalNumber { .. })
        ));
        assert_eq!(transport.request_count(), 0);

        assert!(client.delete_number(&number).await.unwrap());
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/numbers/32.json"
        );
    }

    #[tokio::test]
    async fn delete_local_number_uses_local_endpoint() {
        let transport = FakeTransport::new(204, "");
        let client = make_client(transport.clone());

        assert!(client.delete_local_number(&local_number()).await.unwrap());
        let request = transport.last_request();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path(), "/api/v1.0/accounts/10096/numbers/local/31.json");
    }

    #[tokio::test]
    async fn lookup_number_strips_leading_plus() {
        let json = r#"
        {
          "number_info": {
            "phone_number": "12025550123",
            "carrier": {"name": "Verizon Wireless", "country": "US", "network_code": "004"},
            "device": {"model": "iPhone", "manufacturer": "Apple", "type": "smartphone"}
          }
        }
        "#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone());

        let info = client.lookup_number(&local_number()).await.unwrap();
        assert_eq!(
            info.carrier.as_ref().and_then(|it| it.name.as_deref()),
            Some("Verizon Wireless")
        );
        assert_eq!(
            info.device.as_ref().and_then(|it| it.device_type.as_deref()),
            Some("smartphone")
        );
        let request = transport.last_request();
        assert_eq!(request.path(), "/api/v1.0/accounts/10096/numbers/lookup.json");
        assert_eq!(request.url.query(), Some("phone_number=12025550123"));

        let err = client.lookup_number(&Number::default()).await.unwrap_err();
        assert!(matches!(
            err,
            VivialError::Validation(ValidationError::Missing {
                field: "phone_number"
            })
        ));
    }
}
