//! Recorded vendor pages, trimmed to the parts the adapters read

/// Fisher SDS search result for ethyl mercaptoacetate (623-51-8)
pub const FISHER_RESULTS_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div id="main">
    <div class="catalog_num">
      <div class="catlog_items">
        <a href="/store/msds?partNumber=AAA1432136&productDescription=ethyl-mercaptoacetate-&vendorId=VN00024248&keyword=true&countryCode=US&language=en">AAA1432136</a>
      </div>
    </div>
  </div>
</body></html>"#;

/// Path and query of the sheet linked from [`FISHER_RESULTS_PAGE`]
pub const FISHER_SDS_PATH: &str = "/store/msds";

/// Body served as the Fisher sheet
pub const FISHER_PDF: &[u8] = b"%PDF-1.4\n% ethyl mercaptoacetate, Fisher\n%%EOF\n";

/// Body served as a TCI sheet
pub const TCI_PDF: &[u8] = b"%PDF-1.4\n% TCI\n%%EOF\n";

/// TCI search result listing one hit for `cas_nr` with product `code`
pub fn tci_search_page(cas_nr: &str, code: &str) -> String {
    format!(
        r#"<html><body>
        <p class="search-sum">1 results</p>
        <table class="comp-tbl">
          <tr><th class="comp-th"><span>CAS RN</span></th>
              <td class="comp-td" colspan="2"><span>{cas_nr}</span></td></tr>
        </table>
        <form id="cart1_0" name="cart1_0">
          <input id="commodityCode" name="commodityCode" type="hidden" value="{code}"/>
        </form>
        </body></html>"#
    )
}
