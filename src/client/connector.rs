use std::slice;

use reqwest::Method;
use tracing::{debug, instrument};
use url::Url;

use super::{Reply, VivialClient, VivialError};
use crate::domain::{
    Callback, Connector, ConnectorId, ConnectorPhoneNumber, QueryParams, ValidationError,
};
use crate::transport::{
    decode_connector_response, decode_connectors_response, encode_callbacks_body,
    encode_create_connector_body, encode_phone_numbers_body, encode_update_connector_body,
};

const RESOURCE: &str = "connectors";

fn required_id(connector: &Connector) -> Result<ConnectorId, ValidationError> {
    connector.id.ok_or(ValidationError::Missing {
        field: ConnectorId::FIELD,
    })
}

fn encode_failure(err: crate::transport::TransportError) -> VivialError {
    VivialError::Parse(Box::new(err))
}

impl VivialClient {
    /// Fetch one connector by id, including its callbacks and first 50 phone numbers.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn get_connector_by_id(&self, id: ConnectorId) -> Result<Connector, VivialError> {
        let url = self.resource_url(RESOURCE, Some(&id.to_string()))?;
        self.get(url, &QueryParams::new())
            .await?
            .decode(decode_connector_response)
    }

    /// List the account's connectors.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn get_connectors(&self) -> Result<Vec<Connector>, VivialError> {
        let url = self.resource_url(RESOURCE, None)?;
        self.get(url, &QueryParams::new())
            .await?
            .decode(decode_connectors_response)
    }

    /// Total number of connectors on the account.
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn connector_count(&self) -> Result<u64, VivialError> {
        self.count(self.resource_url(RESOURCE, Some("count"))?)
            .await
    }

    /// Create a connector from its `name` and copy the created resource back.
    #[instrument(skip(self, connector), fields(account_id = %self.account_id))]
    pub async fn create_connector(&self, connector: &mut Connector) -> Result<(), VivialError> {
        let url = self.resource_url(RESOURCE, None)?;
        let returned = self
            .send_json(Method::POST, url, encode_create_connector_body(connector))
            .await?
            .decode(decode_connector_response)?;
        debug!(connector_id = ?returned.id, "connector created");
        connector.update_from(returned);
        Ok(())
    }

    /// Rename a connector and copy the stored resource back.
    #[instrument(
        skip(self, connector),
        fields(account_id = %self.account_id, connector_id = ?connector.id)
    )]
    pub async fn update_connector(&self, connector: &mut Connector) -> Result<(), VivialError> {
        let id = required_id(connector)?;
        let url = self.resource_url(RESOURCE, Some(&id.to_string()))?;
        let returned = self
            .send_json(Method::PUT, url, encode_update_connector_body(id, connector))
            .await?
            .decode(decode_connector_response)?;
        connector.update_from(returned);
        Ok(())
    }

    /// Delete a connector. Returns `true` when the server answers `204 No Content`.
    #[instrument(
        skip(self, connector),
        fields(account_id = %self.account_id, connector_id = ?connector.id)
    )]
    pub async fn delete_connector(&self, connector: &Connector) -> Result<bool, VivialError> {
        let id = required_id(connector)?;
        self.delete(self.resource_url(RESOURCE, Some(&id.to_string()))?)
            .await
    }

    /// Save the connector's queued callbacks as new callbacks.
    #[instrument(
        skip(self, connector),
        fields(account_id = %self.account_id, connector_id = ?connector.id)
    )]
    pub async fn create_callbacks(&self, connector: &mut Connector) -> Result<(), VivialError> {
        let body = encode_callbacks_body(&connector.callbacks).map_err(encode_failure)?;
        let url = self.callbacks_url(connector)?;
        let reply = self.send_json(Method::POST, url, body).await?;
        connector.merge_callbacks(reply.decode(decode_connector_response)?);
        Ok(())
    }

    /// Edit existing callbacks and add any new ones.
    #[instrument(
        skip(self, connector),
        fields(account_id = %self.account_id, connector_id = ?connector.id)
    )]
    pub async fn update_callbacks(&self, connector: &mut Connector) -> Result<(), VivialError> {
        let body = encode_callbacks_body(&connector.callbacks).map_err(encode_failure)?;
        let url = self.callbacks_url(connector)?;
        let reply = self.send_json(Method::PUT, url, body).await?;
        connector.merge_callbacks(reply.decode(decode_connector_response)?);
        Ok(())
    }

    /// Remove the listed callbacks from the connector.
    ///
    /// The connector returned by the server replaces the local callback list; on
    /// `204 No Content` the listed callbacks are dropped locally instead.
    #[instrument(
        skip(self, connector, callbacks),
        fields(account_id = %self.account_id, connector_id = ?connector.id, count = callbacks.len())
    )]
    pub async fn delete_callbacks(
        &self,
        connector: &mut Connector,
        callbacks: &[Callback],
    ) -> Result<(), VivialError> {
        let body = encode_callbacks_body(callbacks).map_err(encode_failure)?;
        let url = self.callbacks_url(connector)?;
        match self.send_json(Method::DELETE, url, body).await? {
            Reply::NoContent => connector.forget_callbacks(callbacks),
            reply => connector.merge_callbacks(reply.decode(decode_connector_response)?),
        }
        Ok(())
    }

    /// Remove one callback from the connector.
    pub async fn delete_single_callback(
        &self,
        connector: &mut Connector,
        callback: &Callback,
    ) -> Result<(), VivialError> {
        self.delete_callbacks(connector, slice::from_ref(callback))
            .await
    }

    /// Remove every callback currently listed on the connector.
    pub async fn delete_all_callbacks(&self, connector: &mut Connector) -> Result<(), VivialError> {
        let callbacks = connector.callbacks.clone();
        self.delete_callbacks(connector, &callbacks).await
    }

    /// Associate the connector's queued phone numbers with it.
    #[instrument(
        skip(self, connector),
        fields(account_id = %self.account_id, connector_id = ?connector.id)
    )]
    pub async fn create_phone_numbers(&self, connector: &mut Connector) -> Result<(), VivialError> {
        let body = encode_phone_numbers_body(&connector.phone_numbers).map_err(encode_failure)?;
        let url = self.phone_numbers_url(connector)?;
        let reply = self.send_json(Method::POST, url, body).await?;
        connector.merge_phone_numbers(reply.decode(decode_connector_response)?);
        Ok(())
    }

    /// Replace the phone numbers associated with the connector.
    #[instrument(
        skip(self, connector),
        fields(account_id = %self.account_id, connector_id = ?connector.id)
    )]
    pub async fn update_phone_numbers(&self, connector: &mut Connector) -> Result<(), VivialError> {
        let body = encode_phone_numbers_body(&connector.phone_numbers).map_err(encode_failure)?;
        let url = self.phone_numbers_url(connector)?;
        let reply = self.send_json(Method::PUT, url, body).await?;
        connector.merge_phone_numbers(reply.decode(decode_connector_response)?);
        Ok(())
    }

    /// Detach the listed phone numbers from the connector.
    ///
    /// Merges the returned connector like [`VivialClient::delete_callbacks`] does.
    #[instrument(
        skip(self, connector, phone_numbers),
        fields(account_id = %self.account_id, connector_id = ?connector.id, count = phone_numbers.len())
    )]
    pub async fn delete_phone_numbers(
        &self,
        connector: &mut Connector,
        phone_numbers: &[ConnectorPhoneNumber],
    ) -> Result<(), VivialError> {
        let body = encode_phone_numbers_body(phone_numbers).map_err(encode_failure)?;
        let url = self.phone_numbers_url(connector)?;
        match self.send_json(Method::DELETE, url, body).await? {
            Reply::NoContent => connector.forget_phone_numbers(phone_numbers),
            reply => connector.merge_phone_numbers(reply.decode(decode_connector_response)?),
        }
        Ok(())
    }

    /// Detach one phone number from the connector.
    pub async fn delete_single_phone_number(
        &self,
        connector: &mut Connector,
        phone_number: &ConnectorPhoneNumber,
    ) -> Result<(), VivialError> {
        self.delete_phone_numbers(connector, slice::from_ref(phone_number))
            .await
    }

    /// Detach every phone number currently listed on the connector.
    pub async fn delete_all_phone_numbers(
        &self,
        connector: &mut Connector,
    ) -> Result<(), VivialError> {
        let phone_numbers = connector.phone_numbers.clone();
        self.delete_phone_numbers(connector, &phone_numbers).await
    }

    fn callbacks_url(&self, connector: &Connector) -> Result<Url, VivialError> {
        let id = required_id(connector)?;
        self.resource_url(RESOURCE, Some(&format!("{id}/callbacks")))
    }

    fn phone_numbers_url(&self, connector: &Connector) -> Result<Url, VivialError> {
        let id = required_id(connector)?;
        self.resource_url(RESOURCE, Some(&format!("{id}/phone_numbers")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::client::fake::{FakeTransport, make_client};
    use crate::domain::{CallbackMethod, NumberId, PhoneNumber};

    const CONNECTOR_JSON: &str = r#"
    {
      "connector": {
        "id": 9,
        "account_id": 10096,
        "active": true,
        "name": "support line",
        "date_created": "2017-05-01T12:00:00+00:00",
        "date_modified": "2017-05-02T12:00:00+00:00",
        "callbacks": [
          {"message_type": "text", "event_type": "incoming", "url": "https://example.com/in", "method": "POST"}
        ],
        "phone_numbers": [
          {"phone_number_id": 31, "phone_number": "+12025550123"}
        ],
        "more_phone_numbers": false
      }
    }
    "#;

    fn stored_connector() -> Connector {
        Connector {
            id: Some(ConnectorId::new(9).unwrap()),
            ..Connector::named("support line")
        }
    }

    #[tokio::test]
    async fn create_connector_posts_name_and_copies_back() {
        let transport = FakeTransport::new(200, CONNECTOR_JSON);
        let client = make_client(transport.clone());

        let mut connector = Connector::named("support line");
        client.create_connector(&mut connector).await.unwrap();

        assert_eq!(connector.id, Some(ConnectorId::new(9).unwrap()));
        assert!(connector.active);
        assert_eq!(connector.callbacks.len(), 1);
        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path(), "/api/v1.0/accounts/10096/connectors.json");
        assert_eq!(
            request.json_body(),
            json!({"connector": {"name": "support line"}})
        );
    }

    #[tokio::test]
    async fn update_and_delete_connector_require_id() {
        let transport = FakeTransport::new(200, CONNECTOR_JSON).then(204, "");
        let client = make_client(transport.clone());

        let err = client
            .update_connector(&mut Connector::named("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VivialError::Validation(ValidationError::Missing {
                field: "connector_id"
            })
        ));
        assert_eq!(transport.request_count(), 0);

        let mut connector = stored_connector();
        connector.name = Some("renamed".to_owned());
        client.update_connector(&mut connector).await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path(), "/api/v1.0/accounts/10096/connectors/9.json");
        assert_eq!(
            request.json_body(),
            json!({"connector": {"id": 9, "name": "renamed"}})
        );
        assert_eq!(connector.name.as_deref(), Some("support line"));

        assert!(client.delete_connector(&connector).await.unwrap());
        assert_eq!(transport.last_request().method, Method::DELETE);
    }

    #[tokio::test]
    async fn list_get_and_count_connectors() {
        let transport = FakeTransport::new(200, r#"{"connectors": [{"id": 1}, {"id": 2}]}"#)
            .then(200, CONNECTOR_JSON)
            .then(200, r#"{"count": 2}"#);
        let client = make_client(transport.clone());

        assert_eq!(client.get_connectors().await.unwrap().len(), 2);
        let connector = client
            .get_connector_by_id(ConnectorId::new(9).unwrap())
            .await
            .unwrap();
        assert_eq!(connector.name.as_deref(), Some("support line"));
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/connectors/9.json"
        );
        assert_eq!(client.connector_count().await.unwrap(), 2);
        assert_eq!(
            transport.last_request().path(),
            "/api/v1.0/accounts/10096/connectors/count.json"
        );
    }

    #[tokio::test]
    async fn create_callbacks_merges_only_callback_fields() {
        let transport = FakeTransport::new(200, CONNECTOR_JSON);
        let client = make_client(transport.clone());

        let mut connector = stored_connector();
        connector.name = Some("local name".to_owned());
        connector.add_callback(Callback::new(
            "text",
            "incoming",
            "https://example.com/in",
            CallbackMethod::Post,
        ));
        client.create_callbacks(&mut connector).await.unwrap();

        assert_eq!(connector.name.as_deref(), Some("local name"));
        assert!(connector.date_modified.is_some());
        assert!(connector.phone_numbers.is_empty());
        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.path(),
            "/api/v1.0/accounts/10096/connectors/9/callbacks.json"
        );
        assert_eq!(
            request.json_body(),
            json!({
                "connector": {
                    "callbacks": [
                        {"message_type": "text", "event_type": "incoming", "url": "https://example.com/in", "method": "POST"}
                    ]
                }
            })
        );

        client.update_callbacks(&mut connector).await.unwrap();
        assert_eq!(transport.last_request().method, Method::PUT);
    }

    #[tokio::test]
    async fn delete_callbacks_merges_returned_state() {
        let transport = FakeTransport::new(
            200,
            r#"{"connector": {"id": 9, "date_modified": "2017-05-03T12:00:00+00:00", "callbacks": []}}"#,
        );
        let client = make_client(transport.clone());

        let mut connector = stored_connector();
        connector
            .add_callback(Callback::new("text", "incoming", "https://a", CallbackMethod::Post))
            .add_callback(Callback::new("text", "status", "https://b", CallbackMethod::Get));
        client.delete_all_callbacks(&mut connector).await.unwrap();

        assert!(connector.callbacks.is_empty());
        assert!(connector.date_modified.is_some());
        let request = transport.last_request();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(
            request.json_body()["connector"]["callbacks"]
                .as_array()
                .map(Vec::len),
            Some(2)
        );
    }

    #[tokio::test]
    async fn delete_single_callback_with_no_content_drops_it_locally() {
        let transport = FakeTransport::new(204, "");
        let client = make_client(transport.clone());

        let status = Callback::new("text", "status", "https://b", CallbackMethod::Get);
        let mut connector = stored_connector();
        connector
            .add_callback(Callback::new("text", "incoming", "https://a", CallbackMethod::Post))
            .add_callback(status.clone());
        client
            .delete_single_callback(&mut connector, &status)
            .await
            .unwrap();

        assert_eq!(connector.callbacks.len(), 1);
        assert_eq!(connector.callbacks[0].event_type, "incoming");
        assert_eq!(
            transport.last_request().json_body(),
            json!({
                "connector": {
                    "callbacks": [
                        {"message_type": "text", "event_type": "status", "url": "https://b", "method": "GET"}
                    ]
                }
            })
        );
    }

    #[tokio::test]
    async fn phone_number_operations_use_phone_numbers_endpoint() {
        let transport = FakeTransport::new(200, CONNECTOR_JSON).then(204, "");
        let client = make_client(transport.clone());

        let mut connector = stored_connector();
        connector.add_phone_number(
            NumberId::new(31).unwrap(),
            &PhoneNumber::parse(None, "+12025550123").unwrap(),
        );
        client.create_phone_numbers(&mut connector).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.path(),
            "/api/v1.0/accounts/10096/connectors/9/phone_numbers.json"
        );
        assert_eq!(
            request.json_body(),
            json!({
                "connector": {
                    "phone_numbers": [{"phone_number_id": 31, "phone_number": "+12025550123"}]
                }
            })
        );
        assert_eq!(connector.phone_numbers.len(), 1);
        assert!(connector.callbacks.is_empty());

        client.delete_all_phone_numbers(&mut connector).await.unwrap();
        assert_eq!(transport.last_request().method, Method::DELETE);
        assert!(connector.phone_numbers.is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_single_phone_number() {
        let transport = FakeTransport::new(200, CONNECTOR_JSON).then(
            200,
            r#"{"connector": {"id": 9, "phone_numbers": [], "more_phone_numbers": false}}"#,
        );
        let client = make_client(transport.clone());

        let mut connector = stored_connector();
        client.update_phone_numbers(&mut connector).await.unwrap();
        assert_eq!(transport.last_request().method, Method::PUT);
        assert_eq!(connector.phone_numbers.len(), 1);

        let entry = connector.phone_numbers[0].clone();
        client
            .delete_single_phone_number(&mut connector, &entry)
            .await
            .unwrap();
        assert!(connector.phone_numbers.is_empty());
        assert_eq!(
            transport.last_request().json_body(),
            json!({
                "connector": {
                    "phone_numbers": [{"phone_number_id": 31, "phone_number": "+12025550123"}]
                }
            })
        );
    }
}
