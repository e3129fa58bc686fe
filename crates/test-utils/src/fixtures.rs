//! Common test fixtures for geoportal WMS tests.
//!
//! This module provides pre-defined test data for the Swiss geoportal:
//! extents, layer names, service endpoints, capabilities documents and
//! configuration files.

/// Extents used across tests, as `(min_x, min_y, max_x, max_y)`.
pub mod bbox {
    /// Switzerland in WGS84.
    pub const SWITZERLAND_WGS84: (f64, f64, f64, f64) = (5.96, 45.82, 10.49, 47.81);

    /// Canton of Basel-Stadt in WGS84.
    pub const BASEL_WGS84: (f64, f64, f64, f64) = (7.55, 47.52, 7.69, 47.6);

    /// Around the federal palace in Bern, in LV95.
    pub const BERN_LV95: (f64, f64, f64, f64) = (2599000.0, 1199000.0, 2601000.0, 1201000.0);
}

/// Reference points: `(lon, lat)` in WGS84 and the matching grid coordinates.
pub mod points {
    /// Old observatory of Bern, origin of the Swiss grids.
    pub const BERN_WGS84: (f64, f64) = (7.438637, 46.951081);
    pub const BERN_LV95: (f64, f64) = (2600000.0, 1200000.0);
    pub const BERN_LV03: (f64, f64) = (600000.0, 200000.0);
}

/// Layer names as published by the services.
pub mod layers {
    pub const PIXELKARTE: &str = "ch.swisstopo.pixelkarte-farbe";
    pub const BUNDESINVENTARE: &str = "ch.bafu.bundesinventare-bln";
    pub const KANTONE: &str = "ch.swisstopo.swissboundaries3d-kanton-flaeche.fill";
    pub const ZEITREIHEN: &str = "ch.swisstopo.zeitreihen";
    pub const PARCELS: &str = "parcels";
}

/// Service endpoints.
pub mod urls {
    pub const ADMIN_WMS: &str = "https://wms.geo.admin.ch/";
    pub const ADMIN_WMS_TEMPLATE: &str = "https://wms{s}.geo.admin.ch/";
    pub const ADMIN_WMS_EXPLICIT: &str = "https://wms{s:5,6,7}.geo.admin.ch/";
    pub const BASEL_WMS: &str = "https://wms.geo.bs.ch/wmsBS";
    pub const EXAMPLE_TEMPLATE: &str = "http://{s}.example.com/wms";
}

/// WMS 1.3.0 capabilities of a Swiss service.
///
/// Three named layers: one with an LV95 bounding box, one with only
/// geographic bounds (and a 4326 box in lat/lon order), and one nested in an
/// unnamed group that declares its style.
pub const CAPABILITIES_130: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms" xmlns:xlink="http://www.w3.org/1999/xlink">
  <Service>
    <Name>WMS</Name>
    <Title>WMS BGDI</Title>
    <Abstract>Federal geodata infrastructure</Abstract>
  </Service>
  <Capability>
    <Request>
      <GetCapabilities>
        <Format>text/xml</Format>
        <DCPType><HTTP><Get><OnlineResource xlink:type="simple" xlink:href="https://wms.geo.admin.ch/?capabilities"/></Get></HTTP></DCPType>
      </GetCapabilities>
      <GetMap>
        <Format>image/png</Format>
        <Format>image/jpeg</Format>
        <DCPType><HTTP><Get><OnlineResource xlink:type="simple" xlink:href="https://wms.geo.admin.ch/?"/></Get></HTTP></DCPType>
      </GetMap>
    </Request>
    <Layer>
      <Title>WMS BGDI</Title>
      <CRS>EPSG:2056</CRS>
      <CRS>EPSG:21781</CRS>
      <CRS>EPSG:4326</CRS>
      <CRS>EPSG:3857</CRS>
      <Layer queryable="1">
        <Name>ch.swisstopo.pixelkarte-farbe</Name>
        <Title>National Maps (color)</Title>
        <EX_GeographicBoundingBox>
          <westBoundLongitude>5.96</westBoundLongitude>
          <eastBoundLongitude>10.49</eastBoundLongitude>
          <southBoundLatitude>45.82</southBoundLatitude>
          <northBoundLatitude>47.81</northBoundLatitude>
        </EX_GeographicBoundingBox>
        <BoundingBox CRS="EPSG:2056" minx="2485000" miny="1075000" maxx="2834000" maxy="1296000"/>
      </Layer>
      <Layer>
        <Name>ch.bafu.bundesinventare-bln</Name>
        <Title>BLN</Title>
        <Abstract>Federal inventory of landscapes &amp; natural monuments</Abstract>
        <EX_GeographicBoundingBox>
          <westBoundLongitude>5.9</westBoundLongitude>
          <eastBoundLongitude>10.5</eastBoundLongitude>
          <southBoundLatitude>45.8</southBoundLatitude>
          <northBoundLatitude>47.8</northBoundLatitude>
        </EX_GeographicBoundingBox>
        <BoundingBox CRS="EPSG:4326" minx="45.8" miny="5.9" maxx="47.8" maxy="10.5"/>
      </Layer>
      <Layer>
        <Title>Boundaries</Title>
        <Style><Name>default</Name><Title>Default</Title></Style>
        <Layer>
          <Name>ch.swisstopo.swissboundaries3d-kanton-flaeche.fill</Name>
          <Title>Cantonal boundaries</Title>
        </Layer>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

/// WMS 1.1.1 capabilities of a cantonal service that only offers WGS84 and
/// Web Mercator.
pub const CAPABILITIES_111: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE WMT_MS_Capabilities SYSTEM "http://schemas.opengis.net/wms/1.1.1/WMS_MS_Capabilities.dtd">
<WMT_MS_Capabilities version="1.1.1">
  <Service>
    <Name>OGC:WMS</Name>
    <Title>Geoportal Basel-Stadt</Title>
  </Service>
  <Capability>
    <Request>
      <GetMap>
        <Format>image/png</Format>
        <DCPType><HTTP><Get><OnlineResource xmlns:xlink="http://www.w3.org/1999/xlink" xlink:href="https://wms.geo.bs.ch/wmsBS?"/></Get></HTTP></DCPType>
      </GetMap>
    </Request>
    <Layer>
      <Title>Basel-Stadt</Title>
      <SRS>EPSG:4326 EPSG:3857</SRS>
      <Layer queryable="0">
        <Name>parcels</Name>
        <Title>Parcels</Title>
        <LatLonBoundingBox minx="7.55" miny="47.52" maxx="7.69" maxy="47.6"/>
        <BoundingBox SRS="EPSG:4326" minx="7.55" miny="47.52" maxx="7.69" maxy="47.6"/>
      </Layer>
    </Layer>
  </Capability>
</WMT_MS_Capabilities>"#;

/// Capabilities of a Web Mercator only service.
pub const CAPABILITIES_MERCATOR_ONLY: &str = r#"<?xml version="1.0"?>
<WMS_Capabilities version="1.3.0">
  <Service><Name>WMS</Name><Title>Tiles</Title></Service>
  <Capability>
    <Layer>
      <Name>osm</Name>
      <Title>OpenStreetMap</Title>
      <CRS>EPSG:3857</CRS>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

/// Layer configuration as served by the layers configuration service.
pub const LAYERS_CONFIG_JSON: &str = r#"{
  "ch.swisstopo.zeitreihen": {
    "label": "Journey through time",
    "type": "wms",
    "gutter": 150,
    "attribution": "swisstopo"
  },
  "ch.swisstopo.swissboundaries3d-kanton-flaeche.fill": {
    "label": "Cantonal boundaries",
    "type": "wms"
  }
}"#;

/// The same configuration in YAML.
pub const LAYERS_CONFIG_YAML: &str = r#"
ch.swisstopo.zeitreihen:
  label: Journey through time
  type: wms
  gutter: 150
  attribution: swisstopo
ch.swisstopo.swissboundaries3d-kanton-flaeche.fill:
  label: Cantonal boundaries
  type: wms
"#;

/// Global options of a viewer working in LV03.
pub const OPTIONS_LV03_YAML: &str = r#"
map_crs: "EPSG:21781"
default_extent:
  min_x: 420000
  min_y: 30000
  max_x: 900000
  max_y: 350000
minimum_retrieving_level: 7
imagery_available_levels: [8, 10, 12, 14, 16]
imagery_metadata_url: "https://3d.geo.admin.ch/imagery/metadata.json"
default_lang: fr
"#;
